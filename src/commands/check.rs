use std::io;
use std::path::Path;

use crate::commands::link::load_and_link;
use crate::error::Result;
use crate::linker::OrderPolicy;
use crate::output::{self, Format, LinkSummary};
use crate::store::document::Source;

/// Load and link a document, report what linking would produce, write nothing.
pub fn run(input: &Path, order: OrderPolicy, format: Format) -> Result<()> {
    let source = Source::from_arg(input);
    let linked = load_and_link(&source, order)?;

    let summary = LinkSummary {
        input: source.to_string(),
        output: None,
        order_policy: order,
        stats: linked.stats,
    };
    output::print_summary(&mut io::stdout().lock(), &summary, format)
}
