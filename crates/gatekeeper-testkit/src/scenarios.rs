//! Named decision scenarios.
//!
//! Each scenario builds an engine, asks one question, and records the
//! expected explanation in its display form. Any engine implementation
//! must produce the same explanation for every scenario.

use std::sync::Arc;

use gatekeeper::Engine;
use gatekeeper_core::{Domain, Permission};
use gatekeeper_policy::DefaultSystemPolicy;

use crate::fixtures::{
    domain, no_code_source, sandbox, unlocated, EngineFixture, CORE_JAR, PLUGIN_JAR,
};

/// A named decision scenario.
#[derive(Debug, Clone)]
pub struct DecisionScenario {
    /// Human-readable name for the scenario.
    pub name: &'static str,
    /// Builds the engine under test.
    pub engine: fn() -> Engine,
    /// The requesting domain.
    pub domain: fn() -> Domain,
    /// The requested permission.
    pub permission: fn() -> Permission,
    /// Expected explanation, as displayed.
    pub expected: &'static str,
}

impl DecisionScenario {
    /// Run the scenario and return the displayed explanation.
    ///
    /// A failing system policy is reported as `error: <message>`.
    pub fn run(&self) -> String {
        let engine = (self.engine)();
        match engine.explain(&(self.domain)(), &(self.permission)()) {
            Ok(decision) => decision.to_string(),
            Err(e) => format!("error: {}", e),
        }
    }
}

fn socket(name: &str, actions: &str) -> Permission {
    Permission::socket(name, actions).expect("scenario socket permission is well formed")
}

fn file(path: &str, actions: &str) -> Permission {
    Permission::file(path, actions).expect("scenario file permission is well formed")
}

fn property(name: &str, actions: &str) -> Permission {
    Permission::property(name, actions).expect("scenario property permission is well formed")
}

/// An engine whose template grants broadly, for checking what escapes it.
fn generous_engine() -> Engine {
    EngineFixture::new()
        .template(file("<<ALL FILES>>", "read"))
        .template(Permission::runtime("setContextClassLoader"))
        .untrusted(property("script.stack.style", "read"))
        .dynamic(socket("*:9200-9300", "listen"))
        .plugin(PLUGIN_JAR, socket("*:443", "connect"))
        .build()
}

/// Get all decision scenarios.
pub fn all_scenarios() -> Vec<DecisionScenario> {
    vec![
        DecisionScenario {
            name: "sandbox file read outside its grant set",
            engine: generous_engine,
            domain: sandbox,
            permission: || file("/etc/passwd", "read"),
            expected: "denied: not granted to sandboxed code",
        },
        DecisionScenario {
            name: "sandbox reads a property it was granted",
            engine: generous_engine,
            domain: sandbox,
            permission: || property("script.stack.style", "read"),
            expected: "granted by untrusted",
        },
        DecisionScenario {
            name: "sandbox cannot use dynamic grants",
            engine: generous_engine,
            domain: sandbox,
            permission: || socket("localhost:9200", "listen"),
            expected: "denied: not granted to sandboxed code",
        },
        DecisionScenario {
            name: "ordinary code asks to stop a thread",
            engine: generous_engine,
            domain: || domain(CORE_JAR),
            permission: || Permission::runtime("stopThread"),
            expected: "denied: bad default stop_thread",
        },
        DecisionScenario {
            name: "ordinary code listens on an ephemeral port",
            engine: generous_engine,
            domain: || domain(CORE_JAR),
            permission: || socket("localhost:0", "listen"),
            expected: "denied: bad default listen_ephemeral",
        },
        DecisionScenario {
            name: "ordinary code listens on the registry port",
            engine: generous_engine,
            domain: || domain(CORE_JAR),
            permission: || socket("127.0.0.1:1099", "listen"),
            expected: "denied: bad default listen_high_ports",
        },
        DecisionScenario {
            name: "plugin connects out under its own grant",
            engine: generous_engine,
            domain: || domain(PLUGIN_JAR),
            permission: || socket("search.example.com:443", "connect"),
            expected: "granted by plugin",
        },
        DecisionScenario {
            name: "plugin grant written as a url",
            engine: generous_engine,
            domain: || domain("file:/plugins/foo.jar"),
            permission: || socket("search.example.com:443", "connect"),
            expected: "granted by plugin",
        },
        DecisionScenario {
            name: "plugin grant does not leak to other code",
            engine: generous_engine,
            domain: || domain(CORE_JAR),
            permission: || socket("search.example.com:443", "connect"),
            expected: "denied: no source grants it",
        },
        DecisionScenario {
            name: "plugin falls through to the template",
            engine: generous_engine,
            domain: || domain(PLUGIN_JAR),
            permission: || Permission::runtime("setContextClassLoader"),
            expected: "granted by template",
        },
        DecisionScenario {
            name: "dynamic grant covers a listen port",
            engine: generous_engine,
            domain: || domain(CORE_JAR),
            permission: || socket("localhost:9250", "listen"),
            expected: "granted by dynamic",
        },
        DecisionScenario {
            name: "platform default property read",
            engine: generous_engine,
            domain: || domain(CORE_JAR),
            permission: || property("os.name", "read"),
            expected: "granted by system",
        },
        DecisionScenario {
            name: "code source without a location",
            engine: generous_engine,
            domain: unlocated,
            permission: || Permission::runtime("setContextClassLoader"),
            expected: "denied: code source has no location",
        },
        DecisionScenario {
            name: "domain without a code source",
            engine: generous_engine,
            domain: no_code_source,
            permission: || Permission::runtime("setContextClassLoader"),
            expected: "denied: no code source",
        },
        DecisionScenario {
            name: "unfiltered platform keeps its bad defaults",
            engine: || {
                EngineFixture::new()
                    .system(Arc::new(DefaultSystemPolicy::new()))
                    .filter_bad_defaults(false)
                    .build()
            },
            domain: || domain(CORE_JAR),
            permission: || Permission::runtime("stopThread"),
            expected: "granted by system",
        },
    ]
}

/// Run every scenario.
///
/// Returns `(name, matches, actual)` for each.
pub fn verify_all_scenarios() -> Vec<(String, bool, String)> {
    all_scenarios()
        .iter()
        .map(|scenario| {
            let actual = scenario.run();
            (scenario.name.to_string(), actual == scenario.expected, actual)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_names_are_unique() {
        let scenarios = all_scenarios();
        let mut names: Vec<_> = scenarios.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), scenarios.len());
    }

    #[test]
    fn test_scenarios_are_deterministic() {
        for scenario in all_scenarios() {
            assert_eq!(scenario.run(), scenario.run(), "{}", scenario.name);
        }
    }
}
