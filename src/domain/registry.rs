//! Static table of known Mandrill calls and the parameters each one accepts.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use serde_json::{Map, Value};

use crate::domain::validation::ValidationError;
use crate::domain::value::ApiKey;

type CallTable = &'static [(&'static str, &'static [(&'static str, &'static [&'static str])])];

// Parameters beyond `key`, which every call accepts.
const KNOWN_CALLS: CallTable = &[
    (
        "users",
        &[
            ("info", &[]),
            ("ping", &[]),
            ("senders", &[]),
            ("disable-sender", &["domain"]),
            ("verify-sender", &["email"]),
        ],
    ),
    (
        "messages",
        &[
            ("send", &["message"]),
            (
                "send-template",
                &["template_name", "template_content", "message"],
            ),
            (
                "search",
                &["query", "date_from", "date_to", "tags", "senders", "limit"],
            ),
        ],
    ),
    (
        "tags",
        &[
            ("list", &[]),
            ("info", &["tag"]),
            ("time-series", &["tag"]),
            ("all-time-series", &[]),
        ],
    ),
    (
        "senders",
        &[
            ("list", &[]),
            ("info", &["address"]),
            ("time-series", &["address"]),
        ],
    ),
    (
        "urls",
        &[("list", &[]), ("search", &["q"]), ("time-series", &["url"])],
    ),
    (
        "templates",
        &[
            ("add", &["name", "code"]),
            ("info", &["name"]),
            ("update", &["name", "code"]),
            ("delete", &["name"]),
            ("list", &[]),
        ],
    ),
    (
        "webhooks",
        &[
            ("list", &[]),
            ("add", &["url", "events"]),
            ("info", &["id"]),
            ("update", &["id", "url", "events"]),
            ("delete", &["id"]),
        ],
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
/// Parameter contract of one (call type, call) pair.
///
/// Invariant: `params` always contains `key`.
pub struct CallSpec {
    call_type: &'static str,
    call_name: &'static str,
    params: BTreeSet<&'static str>,
}

impl CallSpec {
    fn new(call_type: &'static str, call_name: &'static str, extra: &[&'static str]) -> Self {
        let mut params = BTreeSet::from([ApiKey::FIELD]);
        params.extend(extra.iter().copied());
        Self {
            call_type,
            call_name,
            params,
        }
    }

    pub fn call_type(&self) -> &'static str {
        self.call_type
    }

    pub fn call_name(&self) -> &'static str {
        self.call_name
    }

    /// Every parameter name this call accepts, `key` included.
    pub fn params(&self) -> &BTreeSet<&'static str> {
        &self.params
    }

    pub fn allows(&self, name: &str) -> bool {
        self.params.contains(name)
    }

    /// Reject parameters the call does not know about.
    ///
    /// Missing parameters are not reported; Mandrill itself answers those.
    pub fn check_params(&self, params: &Map<String, Value>) -> Result<(), ValidationError> {
        let keys = params
            .keys()
            .filter(|name| !self.allows(name))
            .cloned()
            .collect::<Vec<_>>();
        if keys.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::InvalidParameters { keys })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CallGroup {
    call_type: &'static str,
    calls: Vec<CallSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Every call the client knows how to validate, grouped by call type.
///
/// Groups and calls keep the order Mandrill documents them in.
pub struct Registry {
    groups: Vec<CallGroup>,
}

impl Registry {
    /// The process-wide registry, built on first use.
    pub fn global() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(Registry::build)
    }

    fn build() -> Self {
        let groups = KNOWN_CALLS
            .iter()
            .map(|&(call_type, calls)| CallGroup {
                call_type,
                calls: calls
                    .iter()
                    .map(|&(call_name, extra)| CallSpec::new(call_type, call_name, extra))
                    .collect(),
            })
            .collect();
        Self { groups }
    }

    /// Look up the contract for `call_type`/`call_name`.
    pub fn spec(&self, call_type: &str, call_name: &str) -> Result<&CallSpec, ValidationError> {
        self.group(call_type)?
            .calls
            .iter()
            .find(|spec| spec.call_name == call_name)
            .ok_or_else(|| ValidationError::UnknownCall {
                call_type: call_type.to_owned(),
                call: call_name.to_owned(),
            })
    }

    pub fn call_types(&self) -> Vec<&'static str> {
        self.groups.iter().map(|group| group.call_type).collect()
    }

    pub fn calls(&self, call_type: &str) -> Result<Vec<&'static str>, ValidationError> {
        Ok(self
            .group(call_type)?
            .calls
            .iter()
            .map(|spec| spec.call_name)
            .collect())
    }

    /// Iterate over every call spec, group by group.
    pub fn iter(&self) -> impl Iterator<Item = &CallSpec> {
        self.groups.iter().flat_map(|group| group.calls.iter())
    }

    /// Number of call types.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn group(&self, call_type: &str) -> Result<&CallGroup, ValidationError> {
        self.groups
            .iter()
            .find(|group| group.call_type == call_type)
            .ok_or_else(|| ValidationError::UnknownCallType {
                call_type: call_type.to_owned(),
            })
    }
}
