//! `layouts` subcommand — list strip layouts and their driver codes.

use super::{LayoutJson, LayoutsOutput, Result, StripLayout, print_json};

pub(super) fn layouts_output() -> LayoutsOutput {
    let layouts: Vec<LayoutJson> = StripLayout::ALL
        .iter()
        .map(|l| LayoutJson {
            name: l.name().to_string(),
            code: format!("0x{:08X}", l.code()),
            channels: l.channel_count(),
        })
        .collect();
    LayoutsOutput {
        count: layouts.len(),
        layouts,
    }
}

pub(super) fn cmd_layouts(json: bool) -> Result<()> {
    let output = layouts_output();

    if json {
        print_json(&output);
        return Ok(());
    }

    println!("{:<8}{:<14}Channels", "Layout", "Code");
    for l in &output.layouts {
        println!("{:<8}{:<14}{}", l.name, l.code, l.channels);
    }
    Ok(())
}
