// src/dispatch/request.rs
use crate::config::TargetSet;
use reqwest::Method;
use url::Url;

use super::dispatcher::RequestError;

pub const REMOVE_ACTION: &str = "RemoveComputers";
pub const REMOVE_API_VERSION: &str = "2011-08-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Restart,
    Remove,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Restart => "restart",
            Operation::Remove => "remove",
        }
    }
}

/// A fully prepared request: method, url, and optional JSON body.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub operation: Operation,
    pub method: Method,
    pub url: Url,
    pub body: Option<serde_json::Value>,
}

/// Restart uses a per-computer path for one target and a JSON id array
/// for several.
pub fn restart_request(base: &Url, targets: &TargetSet) -> Result<RequestSpec, RequestError> {
    if let Some(id) = targets.single() {
        let url = base
            .join(&format!("/api/computers/{}/restart", id))
            .map_err(|e| RequestError::Build(e.to_string()))?;

        Ok(RequestSpec {
            operation: Operation::Restart,
            method: Method::POST,
            url,
            body: None,
        })
    } else {
        let url = base
            .join("/api/computers/restart")
            .map_err(|e| RequestError::Build(e.to_string()))?;

        Ok(RequestSpec {
            operation: Operation::Restart,
            method: Method::POST,
            url,
            body: Some(serde_json::json!({ "computer_ids": targets.ids() })),
        })
    }
}

/// Remove goes through the legacy query-action endpoint for any number of
/// targets: ids ride as indexed `computer_ids.<i>` parameters, 1-based, in
/// target order.
pub fn remove_request(base: &Url, targets: &TargetSet) -> Result<RequestSpec, RequestError> {
    let mut url = base
        .join("/api")
        .map_err(|e| RequestError::Build(e.to_string()))?;
    url.set_query(Some(&remove_query(targets.ids())));

    Ok(RequestSpec {
        operation: Operation::Remove,
        method: Method::GET,
        url,
        body: None,
    })
}

fn remove_query(ids: &[u64]) -> String {
    let mut query = format!("action={}&version={}", REMOVE_ACTION, REMOVE_API_VERSION);

    for (i, id) in ids.iter().enumerate() {
        query.push_str(&format!("&computer_ids.{}={}", i + 1, id));
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn base() -> Url {
        Url::parse("http://localhost:9091").unwrap()
    }

    fn targets(ids: &[u64]) -> TargetSet {
        TargetSet::new(ids.to_vec()).unwrap()
    }

    #[test]
    fn single_target_restart_uses_the_per_computer_path() {
        let spec = restart_request(&base(), &targets(&[5])).unwrap();

        assert_eq!(spec.method, Method::POST);
        assert_eq!(spec.url.as_str(), "http://localhost:9091/api/computers/5/restart");
        assert!(spec.body.is_none());
    }

    #[test]
    fn multi_target_restart_carries_all_ids_in_the_body() {
        let spec = restart_request(&base(), &targets(&[5, 9])).unwrap();

        assert_eq!(spec.method, Method::POST);
        assert_eq!(spec.url.as_str(), "http://localhost:9091/api/computers/restart");
        assert_eq!(spec.body, Some(serde_json::json!({ "computer_ids": [5, 9] })));
    }

    #[test]
    fn single_target_remove_uses_the_query_action_endpoint() {
        let spec = remove_request(&base(), &targets(&[5])).unwrap();

        assert_eq!(spec.method, Method::GET);
        assert_eq!(
            spec.url.as_str(),
            "http://localhost:9091/api?action=RemoveComputers&version=2011-08-01&computer_ids.1=5"
        );
        assert!(spec.body.is_none());
    }

    #[test]
    fn multi_target_remove_preserves_order_with_one_based_indexing() {
        let spec = remove_request(&base(), &targets(&[7, 42])).unwrap();

        assert_eq!(
            spec.url.query(),
            Some("action=RemoveComputers&version=2011-08-01&computer_ids.1=7&computer_ids.2=42")
        );
    }

    proptest! {
        #[test]
        fn remove_query_indexes_every_id_in_order(
            ids in proptest::collection::vec(1u64..1_000_000, 1..20)
        ) {
            let query = remove_query(&ids);

            let expected: Vec<String> = ids
                .iter()
                .enumerate()
                .map(|(i, id)| format!("computer_ids.{}={}", i + 1, id))
                .collect();

            prop_assert_eq!(
                query,
                format!(
                    "action={}&version={}&{}",
                    REMOVE_ACTION,
                    REMOVE_API_VERSION,
                    expected.join("&")
                )
            );
        }
    }
}
