use std::io::{self, Write};
use std::sync::Arc;

use algo_visualiser_core::{
    Element, ElementState, Frame, LineId, LineSink, Node, NodeState, RenderTarget, Snapshot,
};

const BAR_COLUMNS: u32 = 50;

/// Prints every frame to stdout as text: one row per bar, or one row per
/// tree level.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    quiet: bool,
}

impl TerminalRenderer {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl RenderTarget for TerminalRenderer {
    fn present(&mut self, frame: &Frame<'_>) -> algo_visualiser_core::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "-- step {} --", frame.step)?;
        match frame.snapshot {
            Snapshot::Bars(elements) => write_bars(&mut out, elements)?,
            Snapshot::Tree(root) => write_tree(&mut out, root)?,
        }
        out.flush()?;
        Ok(())
    }
}

fn element_marker(state: ElementState) -> &'static str {
    match state {
        ElementState::Default => "",
        ElementState::Comparing => "comparing",
        ElementState::Swapping => "swapping",
        ElementState::Pivot => "pivot",
        ElementState::Sorted => "sorted",
    }
}

fn node_marker(state: NodeState) -> char {
    match state {
        NodeState::Default => ' ',
        NodeState::Current => '>',
        NodeState::Processing => '~',
        NodeState::Visited => '*',
    }
}

fn write_bars(out: &mut impl Write, elements: &[Element]) -> io::Result<()> {
    for element in elements {
        let columns = (element.value * BAR_COLUMNS / 100).max(1) as usize;
        writeln!(
            out,
            "{:>4} {:<width$} {}",
            element.value,
            "#".repeat(columns),
            element_marker(element.state),
            width = BAR_COLUMNS as usize,
        )?;
    }
    Ok(())
}

fn write_tree(out: &mut impl Write, root: &Node) -> io::Result<()> {
    let mut rows: Vec<Vec<&Node>> = Vec::new();
    for (node, depth) in root.levels() {
        if rows.len() <= depth {
            rows.resize_with(depth + 1, Vec::new);
        }
        rows[depth].push(node);
    }

    for (depth, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .map(|node| format!("[{}{}]", node_marker(node.state), node.value))
            .collect();
        writeln!(out, "level {depth}: {}", cells.join(" "))?;
    }
    Ok(())
}

/// Line sink that echoes the active pseudocode line of `listing`.
pub fn listing_sink(listing: &'static str, quiet: bool) -> LineSink {
    Arc::new(move |line: LineId| {
        if quiet {
            return;
        }
        if line.is_idle() {
            println!("   (idle)");
            return;
        }
        let text = usize::try_from(line.get())
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| listing.lines().nth(index))
            .unwrap_or("");
        println!("{:>3} | {}", line, text.trim_end());
    })
}

/// The listing with a 1-based line-number gutter matching the line ids.
pub fn numbered_listing(listing: &str) -> String {
    listing
        .lines()
        .enumerate()
        .map(|(index, text)| format!("{:>3} | {text}\n", index + 1))
        .collect()
}
