use serde_json::{Map, Value};

use crate::error::{LinkError, Result};

pub const PROJECT_LIST: &str = "projectList";
pub const TASK_LIST: &str = "taskList";

pub const ORDER_FIELD: &str = "order";
pub const STATUS_FIELD: &str = "status";
pub const PROJECT_FIELD: &str = "project";

pub const PREV_PROJECT: &str = "prevProject";
pub const NEXT_PROJECT: &str = "nextProject";
pub const PREV_TASK: &str = "prevTask";
pub const NEXT_TASK: &str = "nextTask";

/// One of the two keyed collections in a board document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Projects,
    Tasks,
}

impl Collection {
    pub fn key(self) -> &'static str {
        match self {
            Self::Projects => PROJECT_LIST,
            Self::Tasks => TASK_LIST,
        }
    }

    /// Names of the (prev, next) link fields written on this collection's records.
    pub fn link_fields(self) -> (&'static str, &'static str) {
        match self {
            Self::Projects => (PREV_PROJECT, NEXT_PROJECT),
            Self::Tasks => (PREV_TASK, NEXT_TASK),
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Task status as it appears in the document: a label such as `"open"`, or the
/// numeric column code the board front-end uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusKey {
    Named(String),
    Code(i64),
}

impl std::fmt::Display for StatusKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Code(code) => write!(f, "#{code}"),
        }
    }
}

/// Two adjacent tasks share a run iff their keys are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunKey<'a> {
    pub status: &'a StatusKey,
    pub project: &'a str,
}

/// Records that carry a sequencing `order`.
pub trait Ordered {
    fn id(&self) -> &str;
    fn order(&self) -> i64;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub id: String,
    pub order: i64,
    /// Every field of the source record except `order`, in source order.
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub id: String,
    pub order: i64,
    pub status: StatusKey,
    pub project: String,
    /// Every field of the source record except `order`, in source order.
    /// `status` and `project` stay here so they are written back untouched.
    pub fields: Map<String, Value>,
}

impl TaskRecord {
    pub fn run_key(&self) -> RunKey<'_> {
        RunKey {
            status: &self.status,
            project: &self.project,
        }
    }
}

impl Ordered for ProjectRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> i64 {
        self.order
    }
}

impl Ordered for TaskRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> i64 {
        self.order
    }
}

/// A loaded board document.
///
/// `root` keeps every top-level member in its original position. The two
/// collection slots are left as `null` placeholders after loading and are
/// refilled when the linked document is assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub projects: Vec<ProjectRecord>,
    pub tasks: Vec<TaskRecord>,
    pub root: Map<String, Value>,
}

impl Document {
    /// Parse and type-check a document from its JSON text.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|err| LinkError::schema(format!("invalid JSON: {err}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let mut root = match value {
            Value::Object(root) => root,
            other => {
                return Err(LinkError::schema(format!(
                    "document root must be an object, found {}",
                    json_kind(&other)
                )));
            }
        };

        let projects = take_collection(&mut root, Collection::Projects)?
            .into_iter()
            .map(|(id, value)| load_project(id, value))
            .collect::<Result<Vec<_>>>()?;
        let tasks = take_collection(&mut root, Collection::Tasks)?
            .into_iter()
            .map(|(id, value)| load_task(id, value))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            projects,
            tasks,
            root,
        })
    }
}

fn take_collection(root: &mut Map<String, Value>, collection: Collection) -> Result<Map<String, Value>> {
    let Some(slot) = root.get_mut(collection.key()) else {
        return Err(LinkError::schema(format!(
            "document has no `{collection}` member"
        )));
    };
    match slot.take() {
        Value::Object(map) => Ok(map),
        other => Err(LinkError::schema(format!(
            "`{collection}` must be an object keyed by id, found {}",
            json_kind(&other)
        ))),
    }
}

struct RawRecord {
    collection: Collection,
    id: String,
    order: Option<Value>,
    fields: Map<String, Value>,
}

impl RawRecord {
    fn split(collection: Collection, id: String, value: Value) -> Result<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(LinkError::schema(format!(
                    "{collection} record '{id}' must be an object, found {}",
                    json_kind(&other)
                )));
            }
        };

        let mut order = None;
        let fields = map
            .into_iter()
            .filter_map(|(key, value)| {
                if key == ORDER_FIELD {
                    order = Some(value);
                    None
                } else {
                    Some((key, value))
                }
            })
            .collect();

        Ok(Self {
            collection,
            id,
            order,
            fields,
        })
    }

    fn missing(&self, field: &'static str) -> LinkError {
        LinkError::MissingField {
            collection: self.collection,
            id: self.id.clone(),
            field,
        }
    }

    fn wrong_type(&self, field: &str, expected: &str, found: &Value) -> LinkError {
        LinkError::schema(format!(
            "{} record '{}' field `{field}` must be {expected}, found {}",
            self.collection,
            self.id,
            json_kind(found)
        ))
    }

    fn order(&self) -> Result<i64> {
        let value = self.order.as_ref().ok_or_else(|| self.missing(ORDER_FIELD))?;
        value
            .as_i64()
            .ok_or_else(|| self.wrong_type(ORDER_FIELD, "an integer", value))
    }

    fn required(&self, field: &'static str) -> Result<&Value> {
        self.fields.get(field).ok_or_else(|| self.missing(field))
    }
}

fn load_project(id: String, value: Value) -> Result<ProjectRecord> {
    let raw = RawRecord::split(Collection::Projects, id, value)?;
    let order = raw.order()?;
    Ok(ProjectRecord {
        id: raw.id,
        order,
        fields: raw.fields,
    })
}

fn load_task(id: String, value: Value) -> Result<TaskRecord> {
    let raw = RawRecord::split(Collection::Tasks, id, value)?;
    let order = raw.order()?;

    let status = match raw.required(STATUS_FIELD)? {
        Value::String(name) => StatusKey::Named(name.clone()),
        value => match value.as_i64() {
            Some(code) => StatusKey::Code(code),
            None => return Err(raw.wrong_type(STATUS_FIELD, "a string or an integer", value)),
        },
    };
    let project = match raw.required(PROJECT_FIELD)? {
        Value::String(project) => project.clone(),
        value => return Err(raw.wrong_type(PROJECT_FIELD, "a string", value)),
    };

    Ok(TaskRecord {
        id: raw.id,
        order,
        status,
        project,
        fields: raw.fields,
    })
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn board(projects: Value, tasks: Value) -> Value {
        json!({ "projectList": projects, "taskList": tasks })
    }

    #[test]
    fn loads_records_in_source_order_without_order_field() {
        let doc = Document::from_value(board(
            json!({
                "B": { "title": "Second", "order": 1 },
                "A": { "title": "First", "order": 0 }
            }),
            json!({
                "t1": { "title": "x", "status": "open", "project": "A", "order": 0 }
            }),
        ))
        .unwrap();

        let ids: Vec<&str> = doc.projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(doc.projects[0].order, 1);
        assert!(!doc.projects[0].fields.contains_key("order"));

        let task = &doc.tasks[0];
        assert_eq!(task.status, StatusKey::Named("open".into()));
        assert_eq!(task.project, "A");
        let keys: Vec<&str> = task.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "status", "project"]);
    }

    #[test]
    fn numeric_status_is_a_distinct_key_from_its_label() {
        let doc = Document::from_value(board(
            json!({}),
            json!({
                "t1": { "status": 1, "project": "A", "order": 0 },
                "t2": { "status": "1", "project": "A", "order": 1 }
            }),
        ))
        .unwrap();

        assert_eq!(doc.tasks[0].status, StatusKey::Code(1));
        assert_ne!(doc.tasks[0].run_key(), doc.tasks[1].run_key());
    }

    #[test]
    fn keeps_other_top_level_members_in_place() {
        let doc = Document::from_value(json!({
            "userLastState": { "project": "A" },
            "projectList": {},
            "taskList": {},
            "version": 2
        }))
        .unwrap();

        let keys: Vec<&str> = doc.root.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["userLastState", "projectList", "taskList", "version"]);
        assert_eq!(doc.root["projectList"], Value::Null);
    }

    #[test]
    fn missing_order_is_a_missing_field_error() {
        let err = Document::from_value(board(json!({ "A": { "title": "no order" } }), json!({})))
            .unwrap_err();
        assert!(matches!(
            err,
            LinkError::MissingField { collection: Collection::Projects, ref id, field: "order" } if id == "A"
        ));
    }

    #[test]
    fn missing_task_project_is_a_missing_field_error() {
        let err = Document::from_value(board(
            json!({}),
            json!({ "t1": { "status": "open", "order": 0 } }),
        ))
        .unwrap_err();
        assert!(matches!(err, LinkError::MissingField { field: "project", .. }));
    }

    #[test]
    fn missing_task_status_is_a_missing_field_error() {
        let err = Document::from_value(board(
            json!({}),
            json!({ "t1": { "project": "A", "order": 0 } }),
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            LinkError::MissingField { collection: Collection::Tasks, ref id, field: "status" } if id == "t1"
        ));
        assert_eq!(
            err.to_string(),
            "taskList record 't1' is missing required field `status`"
        );
    }

    #[test]
    fn missing_collection_is_a_schema_error() {
        let err = Document::from_value(json!({ "projectList": {} })).unwrap_err();
        assert_eq!(err.code(), "schema_error");
        assert!(err.to_string().contains("taskList"));
    }

    #[test]
    fn wrong_types_are_schema_errors() {
        let cases = [
            json!([]),
            board(json!([]), json!({})),
            board(json!({ "A": "not a record" }), json!({})),
            board(json!({ "A": { "order": "0" } }), json!({})),
            board(json!({ "A": { "order": 1.5 } }), json!({})),
            board(
                json!({}),
                json!({ "t1": { "status": null, "project": "A", "order": 0 } }),
            ),
            board(
                json!({}),
                json!({ "t1": { "status": "open", "project": 3, "order": 0 } }),
            ),
        ];
        for case in cases {
            let err = Document::from_value(case.clone()).unwrap_err();
            assert_eq!(err.code(), "schema_error", "case: {case}");
        }
    }

    #[test]
    fn syntax_errors_are_schema_errors() {
        let err = Document::parse("{ \"projectList\": ").unwrap_err();
        assert_eq!(err.code(), "schema_error");
        assert!(err.to_string().contains("invalid JSON"));
    }
}
