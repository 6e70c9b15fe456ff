use std::io;
use std::path::Path;

use crate::error::Result;
use crate::linker::{self, Linked, OrderPolicy};
use crate::model::Document;
use crate::output::{self, Format, LinkSummary};
use crate::store::document::{self, Sink, Source};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkOptions {
    pub order: OrderPolicy,
    /// Echo the linked document to the console before writing it.
    pub dump: bool,
    /// Replace an existing output file.
    pub force: bool,
}

pub fn run(input: &Path, output: &Path, options: &LinkOptions, format: Format) -> Result<()> {
    let source = Source::from_arg(input);
    let sink = Sink::from_arg(output);
    sink.check_writable(&source, options.force)?;

    let linked = load_and_link(&source, options.order)?;
    let rendered = document::render(&linked.document)?;

    // stdout carries the document itself when it is the sink
    let mut console: Box<dyn io::Write> = if sink.is_stdout() {
        Box::new(io::stderr().lock())
    } else {
        Box::new(io::stdout().lock())
    };

    if options.dump {
        output::print_dump(&mut console, &linked.document)?;
    }

    sink.write(&rendered)?;
    log::info!(
        "event=link_done output={sink} projects={} tasks={} runs={}",
        linked.stats.projects,
        linked.stats.tasks,
        linked.stats.task_runs
    );

    let summary = LinkSummary {
        input: source.to_string(),
        output: Some(sink.to_string()),
        order_policy: options.order,
        stats: linked.stats,
    };
    output::print_summary(&mut console, &summary, format)
}

/// Read, type-check and link a document without writing anything.
pub fn load_and_link(source: &Source, order: OrderPolicy) -> Result<Linked> {
    let raw = source.read()?;
    let doc = Document::parse(&raw)?;
    log::info!(
        "event=document_loaded source={source} projects={} tasks={}",
        doc.projects.len(),
        doc.tasks.len()
    );
    linker::link(doc, order)
}
