//! Tags command - print the tag vocabulary

use anyhow::Result;
use nether_anim::{Param, TAGS, TagDescriptor};

/// Execute the tags command
pub fn execute() -> Result<()> {
    println!("{:<4} {:<9} {:<8} DESCRIPTION", "TAG", "PARAM", "PERSISTS");
    for tag in TAGS.iter() {
        println!("{}", format_row(tag));
    }
    Ok(())
}

fn param_name(param: Param) -> &'static str {
    match param {
        Param::None => "none",
        Param::Required => "required",
        Param::Optional => "optional",
    }
}

fn format_row(tag: &TagDescriptor) -> String {
    format!(
        "{:<4} {:<9} {:<8} {}",
        tag.mnemonic,
        param_name(tag.param),
        if tag.persists { "yes" } else { "no" },
        tag.description
    )
}
