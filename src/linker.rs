//! Derives prev/next navigation links for a loaded board document.
//!
//! Projects form one chain across the whole collection. Tasks form chains
//! only within runs: maximal contiguous stretches sharing the same
//! `(status, project)` pair. Adjacency is positional, so the same pair
//! appearing twice with something else in between yields two runs.

use std::ops::Range;

use clap::ValueEnum;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{LinkError, Result};
use crate::model::{Collection, Document, Ordered, RunKey};

/// How a collection's iteration order is established before linking.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OrderPolicy {
    /// Stable sort by `order`; ties keep their input position.
    #[default]
    Sort,
    /// Keep input order, fail on the first record whose `order` decreases.
    Strict,
    /// Keep input order without looking at `order`.
    AsGiven,
}

impl std::fmt::Display for OrderPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sort => write!(f, "sort"),
            Self::Strict => write!(f, "strict"),
            Self::AsGiven => write!(f, "as-given"),
        }
    }
}

/// Identifiers of a record's neighbours, `None` where the chain ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Links<'a> {
    pub prev: Option<&'a str>,
    pub next: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LinkStats {
    pub projects: usize,
    pub tasks: usize,
    pub task_runs: usize,
    pub longest_run: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Linked {
    pub document: Value,
    pub stats: LinkStats,
}

/// Put `records` into linking order according to `policy`.
pub fn arrange<R: Ordered>(
    records: &mut [R],
    collection: Collection,
    policy: OrderPolicy,
) -> Result<()> {
    match policy {
        OrderPolicy::Sort => records.sort_by_key(|record| record.order()),
        OrderPolicy::Strict => {
            for pair in records.windows(2) {
                let (before, after) = (&pair[0], &pair[1]);
                if after.order() < before.order() {
                    return Err(LinkError::OrderViolation {
                        collection,
                        id: after.id().to_string(),
                        order: after.order(),
                        previous: before.order(),
                    });
                }
            }
        }
        OrderPolicy::AsGiven => {}
    }
    Ok(())
}

/// Chain every id to its positional neighbours.
pub fn chain<'a>(ids: &[&'a str]) -> Vec<Links<'a>> {
    (0..ids.len())
        .map(|i| Links {
            prev: i.checked_sub(1).map(|p| ids[p]),
            next: ids.get(i + 1).copied(),
        })
        .collect()
}

/// Split a sequence of run keys into maximal runs of equal adjacent keys.
pub fn runs(keys: &[RunKey<'_>]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=keys.len() {
        if i == keys.len() || keys[i] != keys[i - 1] {
            runs.push(start..i);
            start = i;
        }
    }
    runs
}

/// Chain ids within each run; links never cross a run boundary.
pub fn chain_runs<'a>(ids: &[&'a str], runs: &[Range<usize>]) -> Vec<Links<'a>> {
    runs.iter()
        .flat_map(|run| chain(&ids[run.clone()]))
        .collect()
}

/// Link a loaded document and assemble the output value.
///
/// The result is freshly built: each record is its original fields minus
/// `order`, followed by its two link fields. Top-level members other than the
/// two collections are carried over in place.
pub fn link(mut doc: Document, policy: OrderPolicy) -> Result<Linked> {
    arrange(&mut doc.projects, Collection::Projects, policy)?;
    arrange(&mut doc.tasks, Collection::Tasks, policy)?;

    let project_ids: Vec<&str> = doc.projects.iter().map(|p| p.id.as_str()).collect();
    let project_links = chain(&project_ids);

    let task_ids: Vec<&str> = doc.tasks.iter().map(|t| t.id.as_str()).collect();
    let keys: Vec<RunKey<'_>> = doc.tasks.iter().map(|t| t.run_key()).collect();
    let task_runs = runs(&keys);
    for run in &task_runs {
        let key = keys[run.start];
        log::trace!(
            "event=task_run status={} project={} first={} len={}",
            key.status,
            key.project,
            task_ids[run.start],
            run.len()
        );
    }
    let task_links = chain_runs(&task_ids, &task_runs);

    let stats = LinkStats {
        projects: doc.projects.len(),
        tasks: doc.tasks.len(),
        task_runs: task_runs.len(),
        longest_run: task_runs.iter().map(|r| r.len()).max().unwrap_or(0),
    };
    log::debug!(
        "event=links_derived projects={} tasks={} runs={} policy={policy}",
        stats.projects,
        stats.tasks,
        stats.task_runs
    );

    let projects = assemble(
        Collection::Projects,
        doc.projects.iter().map(|p| (p.id.as_str(), &p.fields)),
        &project_links,
    );
    let tasks = assemble(
        Collection::Tasks,
        doc.tasks.iter().map(|t| (t.id.as_str(), &t.fields)),
        &task_links,
    );

    let mut root = doc.root;
    root.insert(Collection::Projects.key().to_string(), Value::Object(projects));
    root.insert(Collection::Tasks.key().to_string(), Value::Object(tasks));

    Ok(Linked {
        document: Value::Object(root),
        stats,
    })
}

fn assemble<'r>(
    collection: Collection,
    records: impl Iterator<Item = (&'r str, &'r Map<String, Value>)>,
    links: &[Links<'_>],
) -> Map<String, Value> {
    let (prev_field, next_field) = collection.link_fields();
    records
        .zip(links)
        .map(|((id, fields), links)| {
            let mut record = fields.clone();
            record.insert(prev_field.to_string(), link_value(links.prev));
            record.insert(next_field.to_string(), link_value(links.next));
            (id.to_string(), Value::Object(record))
        })
        .collect()
}

fn link_value(id: Option<&str>) -> Value {
    id.map_or(Value::Null, |id| Value::String(id.to_string()))
}
