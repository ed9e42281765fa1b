use crate::config::Config;
use crate::error::{ResolveError, ResolveResult};
use crate::http::{self, GraphQlResponse};
use crate::types::{FieldCollection, FieldDescriptor, ProjectIdentity, RawField, ResolvedProject};
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::Value;

/// Built-in project fields that the custom-fields API cannot address.
pub const BUILTIN_FIELDS: [&str; 8] = [
    "Title",
    "Assignees",
    "Labels",
    "Linked pull requests",
    "Reviewers",
    "Repository",
    "Milestone",
    "Tracks",
];

/// Page size of the field query. Larger projects are truncated.
pub const FIELD_PAGE_SIZE: usize = 20;

pub const PROJECT_ID_QUERY: &str = r#"
query($org: String!, $number: Int!) {
  organization(login: $org) {
    projectV2(number: $number) {
      id
    }
  }
}
"#;

pub const PROJECT_FIELDS_QUERY: &str = r#"
query($node: ID!) {
  node(id: $node) {
    ... on ProjectV2 {
      fields(first: 20) {
        nodes {
          ... on ProjectV2Field {
            id
            name
          }
          ... on ProjectV2IterationField {
            id
            name
            configuration {
              iterations {
                startDate
                id
              }
            }
          }
          ... on ProjectV2SingleSelectField {
            id
            name
            options {
              id
              name
            }
          }
        }
      }
    }
  }
}
"#;

/// Exact, case-sensitive match against [`BUILTIN_FIELDS`].
pub fn is_builtin_field(name: &str) -> bool {
    BUILTIN_FIELDS.contains(&name)
}

/// Drop built-in fields and key the rest by name.
pub fn build_field_collection(nodes: Vec<RawField>) -> FieldCollection {
    nodes
        .into_iter()
        .filter(|f| !is_builtin_field(&f.name))
        .map(|f| (f.name.clone(), FieldDescriptor::from(f)))
        .collect()
}

// Walk `data` along `path`, treating JSON null like an absent key.
fn lookup<'a>(resp: &'a GraphQlResponse<Value>, path: &[&str]) -> ResolveResult<&'a Value> {
    let missing = |depth: usize| {
        let walked = std::iter::once("data")
            .chain(path[..depth].iter().copied())
            .collect::<Vec<_>>()
            .join(".");
        ResolveError::data_shape(walked, resp.error_summary())
    };
    let mut cur = resp.data.as_ref().filter(|v| !v.is_null()).ok_or_else(|| missing(0))?;
    for (i, key) in path.iter().enumerate() {
        cur = cur.get(*key).filter(|v| !v.is_null()).ok_or_else(|| missing(i + 1))?;
    }
    Ok(cur)
}

// A missing key is a data-shape failure; a value of the wrong JSON type is unexpected.
fn require_str(
    record: &Value,
    key: &str,
    path: &str,
    graphql_errors: &Option<String>,
) -> ResolveResult<()> {
    match record.get(key) {
        None | Some(Value::Null) => Err(ResolveError::data_shape(
            format!("{}.{}", path, key),
            graphql_errors.clone(),
        )),
        Some(Value::String(_)) => Ok(()),
        Some(other) => Err(ResolveError::Unexpected(format!(
            "{}.{} is not a string: {}",
            path, key, other
        ))),
    }
}

fn parse_field_nodes(nodes: &Value, graphql_errors: Option<String>) -> ResolveResult<Vec<RawField>> {
    let list = nodes.as_array().ok_or_else(|| {
        ResolveError::Unexpected(format!("data.node.fields.nodes is not a list: {}", nodes))
    })?;
    for (i, record) in list.iter().enumerate() {
        let path = format!("data.node.fields.nodes[{}]", i);
        if !record.is_object() {
            return Err(ResolveError::Unexpected(format!(
                "{} is not an object: {}",
                path, record
            )));
        }
        require_str(record, "id", &path, &graphql_errors)?;
        require_str(record, "name", &path, &graphql_errors)?;
        match record.get("options") {
            None | Some(Value::Null) => {}
            Some(Value::Array(options)) => {
                for (j, option) in options.iter().enumerate() {
                    let opt_path = format!("{}.options[{}]", path, j);
                    if !option.is_object() {
                        return Err(ResolveError::Unexpected(format!(
                            "{} is not an object: {}",
                            opt_path, option
                        )));
                    }
                    require_str(option, "id", &opt_path, &graphql_errors)?;
                    require_str(option, "name", &opt_path, &graphql_errors)?;
                }
            }
            Some(other) => {
                return Err(ResolveError::Unexpected(format!(
                    "{}.options is not a list: {}",
                    path, other
                )))
            }
        }
    }
    serde_json::from_value(nodes.clone())
        .map_err(|e| ResolveError::Unexpected(format!("data.node.fields.nodes: {}", e)))
}

pub struct ProjectFieldResolver {
    client: Client,
    cfg: Config,
}

impl ProjectFieldResolver {
    pub fn new(cfg: Config) -> ResolveResult<Self> {
        let client = http::build_client(&cfg)?;
        Ok(Self { client, cfg })
    }

    /// Look up the project id, then its fields. The field query is only sent
    /// once the first call has produced an id.
    pub async fn resolve(&self, project: &ProjectIdentity) -> ResolveResult<ResolvedProject> {
        let project_id = self.project_id(project).await?;
        debug!("resolved {}/{} to {}", project.org, project.number, project_id);
        let fields = self.fields(&project_id).await?;
        info!("found {} custom field(s)", fields.len());
        Ok(ResolvedProject { project_id, fields })
    }

    async fn project_id(&self, project: &ProjectIdentity) -> ResolveResult<String> {
        let vars = serde_json::json!({ "org": project.org, "number": project.number });
        let resp = http::graphql_post(&self.client, &self.cfg, PROJECT_ID_QUERY, &vars).await?;
        let id = lookup(&resp, &["organization", "projectV2", "id"])?;
        id.as_str().map(str::to_string).ok_or_else(|| {
            ResolveError::data_shape("data.organization.projectV2.id", resp.error_summary())
        })
    }

    async fn fields(&self, project_id: &str) -> ResolveResult<FieldCollection> {
        let vars = serde_json::json!({ "node": project_id });
        let resp = http::graphql_post(&self.client, &self.cfg, PROJECT_FIELDS_QUERY, &vars).await?;
        let nodes = lookup(&resp, &["node", "fields", "nodes"])?;
        let nodes = parse_field_nodes(nodes, resp.error_summary())?;
        if nodes.len() >= FIELD_PAGE_SIZE {
            warn!(
                "project returned {} fields; only the first page is fetched and the rest are omitted",
                nodes.len()
            );
        }
        Ok(build_field_collection(nodes))
    }
}

/// One-shot convenience: resolve against the public GitHub endpoint.
pub async fn resolve(org: &str, project_number: i32, token: &str) -> ResolveResult<ResolvedProject> {
    let resolver = ProjectFieldResolver::new(Config::new(token))?;
    resolver
        .resolve(&ProjectIdentity::new(org, project_number))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::FieldKind;

    fn nodes(v: Value) -> Vec<RawField> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn builtin_match_is_exact_and_case_sensitive() {
        for name in BUILTIN_FIELDS {
            assert!(is_builtin_field(name));
        }
        assert!(!is_builtin_field("title"));
        assert!(!is_builtin_field("Linked Pull Requests"));
        assert!(!is_builtin_field("Title "));
        assert!(!is_builtin_field("Status"));
    }

    #[test]
    fn builtins_dropped_in_any_position() {
        let raw = nodes(serde_json::json!([
            {"id":"A","name":"Assignees"},
            {"id":"S","name":"Status","options":[]},
            {"id":"T","name":"Title"},
            {"id":"P","name":"Priority"},
            {"id":"K","name":"Tracks"}
        ]));
        let fields = build_field_collection(raw);
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["Priority", "Status"]);
        for name in BUILTIN_FIELDS {
            assert!(!fields.contains_key(name));
        }
    }

    #[test]
    fn keys_match_descriptor_names() {
        let raw = nodes(serde_json::json!([
            {"id":"S","name":"Status","options":[{"id":"O1","name":"Todo"}]},
            {"id":"E","name":"Estimate"},
            {"id":"I","name":"Sprint","configuration":{"iterations":[]}}
        ]));
        let fields = build_field_collection(raw);
        assert_eq!(fields.len(), 3);
        for (k, v) in &fields {
            assert_eq!(k, &v.name);
        }
        assert_eq!(fields["Estimate"].id, "E");
        assert_eq!(fields["Estimate"].kind, FieldKind::Plain);
        assert_eq!(fields["Sprint"].kind, FieldKind::Iteration);
    }

    #[test]
    fn duplicate_option_names_keep_the_later_id() {
        let raw = nodes(serde_json::json!([
            {"id":"S","name":"Status","options":[
                {"id":"O1","name":"Todo"},
                {"id":"O2","name":"Done"},
                {"id":"O3","name":"Todo"}
            ]}
        ]));
        let fields = build_field_collection(raw);
        let opts = fields["Status"].options().unwrap();
        assert_eq!(opts.len(), 2);
        assert_eq!(opts["Todo"], "O3");
        assert_eq!(opts["Done"], "O2");
    }

    #[test]
    fn lookup_reports_first_missing_segment() {
        let resp: GraphQlResponse<Value> = serde_json::from_value(serde_json::json!({
            "data": {"organization": {"projectV2": null}},
            "errors": [{"message": "Could not resolve to a ProjectV2 with the number 7."}]
        }))
        .unwrap();
        let err = lookup(&resp, &["organization", "projectV2", "id"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataShape);
        match err {
            ResolveError::DataShape {
                path,
                graphql_errors,
            } => {
                assert_eq!(path, "data.organization.projectV2");
                assert!(graphql_errors.unwrap().contains("number 7"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_keys_are_data_shape_failures() {
        let err = parse_field_nodes(&serde_json::json!([{"id": "F1"}]), None).unwrap_err();
        match err {
            ResolveError::DataShape { path, .. } => assert_eq!(path, "data.node.fields.nodes[0].name"),
            other => panic!("unexpected {:?}", other),
        }
        let err = parse_field_nodes(
            &serde_json::json!([{"id": "F1", "name": "Status", "options": [{"id": "O1"}]}]),
            None,
        )
        .unwrap_err();
        match err {
            ResolveError::DataShape { path, .. } => {
                assert_eq!(path, "data.node.fields.nodes[0].options[0].name")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn wrong_types_are_unexpected_failures() {
        let cases = [
            serde_json::json!([null]),
            serde_json::json!([{"id": "F1", "name": 7}]),
            serde_json::json!([{"id": ["F1"], "name": "Status"}]),
            serde_json::json!([{"id": "F1", "name": "Status", "options": "Todo"}]),
            serde_json::json!([{"id": "F1", "name": "Status", "options": [null]}]),
            serde_json::json!({"id": "F1", "name": "Status"}),
        ];
        for nodes in cases {
            let err = parse_field_nodes(&nodes, None).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unexpected, "{}", nodes);
        }
    }

    #[test]
    fn well_formed_records_parse() {
        let parsed = parse_field_nodes(
            &serde_json::json!([
                {"id": "F1", "name": "Status", "options": [{"id": "O1", "name": "Todo"}]},
                {"id": "F2", "name": "Sprint", "configuration": {"iterations": []}},
                {"id": "F3", "name": "Notes"}
            ]),
            None,
        )
        .unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].options.as_ref().unwrap()[0].name, "Todo");
    }

    #[test]
    fn lookup_without_data() {
        let resp: GraphQlResponse<Value> =
            serde_json::from_value(serde_json::json!({"errors": [{"message": "Bad"}]})).unwrap();
        match lookup(&resp, &["node"]).unwrap_err() {
            ResolveError::DataShape { path, .. } => assert_eq!(path, "data"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
