//! The two-service catalog: which binaries run, and on which ports.
//!
//! Everything downstream reads this pair: the image recipes take their
//! `EXPOSE`/`CMD` lines from it, the supervisor launches it, and the
//! artifact audits check rendered files against it.

use serde::{Deserialize, Serialize};

/// One long-running service: a workspace binary and the port it serves on.
///
/// # Examples
///
/// ```
/// use parseo_core::ServiceSpec;
///
/// let api = ServiceSpec {
///     binary: "parseo-api".to_owned(),
///     port: 8080,
/// };
/// assert_eq!(api.port, 8080);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Binary name (built with `cargo build --bin <name>`, run as the
    /// container's default command)
    pub binary: String,
    /// Port the service listens on (becomes the child's PORT variable)
    pub port: u16,
}

/// The deployable unit: the public API service and the analyzer service.
///
/// The shape of the pair is fixed (two services, run concurrently, first
/// exit wins) while binaries and ports stay configurable per project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePair {
    #[serde(default = "default_api")]
    pub api: ServiceSpec,
    #[serde(default = "default_analyzer")]
    pub analyzer: ServiceSpec,
}

impl Default for ServicePair {
    fn default() -> Self {
        Self {
            api: default_api(),
            analyzer: default_analyzer(),
        }
    }
}

impl ServicePair {
    /// Both services with their catalog names, API first.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ServiceSpec)> {
        [("api", &self.api), ("analyzer", &self.analyzer)].into_iter()
    }

    /// Reject catalogs the rest of the pipeline cannot act on:
    /// both services behind one port, or one binary wearing two names.
    pub fn validate(&self) -> crate::Result<()> {
        if self.api.port == self.analyzer.port {
            return Err(crate::Error::DuplicateServicePort {
                left: "api".to_owned(),
                right: "analyzer".to_owned(),
                port: self.api.port,
            });
        }
        if self.api.binary == self.analyzer.binary {
            return Err(crate::Error::DuplicateServiceBinary {
                left: "api".to_owned(),
                right: "analyzer".to_owned(),
                binary: self.api.binary.clone(),
            });
        }
        Ok(())
    }

    /// Configured binaries that the workspace does not build.
    pub fn missing_binaries(&self, built: &[String]) -> Vec<(String, String)> {
        self.iter()
            .filter(|(_, spec)| !built.contains(&spec.binary))
            .map(|(name, spec)| (name.to_owned(), spec.binary.clone()))
            .collect()
    }

    /// Check every configured service against the workspace's binary targets.
    ///
    /// # Errors
    ///
    /// [`Error::MissingServiceBinary`](crate::Error::MissingServiceBinary) for
    /// the first service whose binary the workspace does not build.
    pub fn ensure_buildable(&self, meta: &crate::WorkspaceMeta) -> crate::Result<()> {
        let built: Vec<String> = meta.binaries.iter().map(|b| b.name.clone()).collect();
        if let Some((service, binary)) = self.missing_binaries(&built).into_iter().next() {
            return Err(crate::Error::MissingServiceBinary {
                service,
                binary,
                available: built,
            });
        }
        Ok(())
    }
}

fn default_api() -> ServiceSpec {
    ServiceSpec {
        binary: "parseo-api".to_owned(),
        port: 8080,
    }
}

fn default_analyzer() -> ServiceSpec {
    ServiceSpec {
        binary: "parseo-analyzer".to_owned(),
        port: 5000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(api_bin: &str, api_port: u16, an_bin: &str, an_port: u16) -> ServicePair {
        ServicePair {
            api: ServiceSpec {
                binary: api_bin.to_owned(),
                port: api_port,
            },
            analyzer: ServiceSpec {
                binary: an_bin.to_owned(),
                port: an_port,
            },
        }
    }

    #[test]
    fn defaults_match_shipped_binaries() {
        let pair = ServicePair::default();
        assert_eq!(pair.api.binary, "parseo-api");
        assert_eq!(pair.api.port, 8080);
        assert_eq!(pair.analyzer.binary, "parseo-analyzer");
        assert_eq!(pair.analyzer.port, 5000);
        pair.validate().unwrap();
    }

    #[test]
    fn iter_yields_api_first() {
        let pair = ServicePair::default();
        let names: Vec<&str> = pair.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["api", "analyzer"]);
    }

    #[test]
    fn validate_rejects_shared_port() {
        let result = pair("a", 8080, "b", 8080).validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("8080"), "got: {err}");
    }

    #[test]
    fn validate_rejects_shared_binary() {
        let result = pair("same", 8080, "same", 5000).validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("same"), "got: {err}");
    }

    #[test]
    fn missing_binaries_empty_when_all_built() {
        let pair = ServicePair::default();
        let built = vec!["parseo-api".to_owned(), "parseo-analyzer".to_owned()];
        assert!(pair.missing_binaries(&built).is_empty());
    }

    #[test]
    fn missing_binaries_reports_service_name() {
        let pair = ServicePair::default();
        let built = vec!["parseo-api".to_owned()];
        let missing = pair.missing_binaries(&built);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].0, "analyzer");
        assert_eq!(missing[0].1, "parseo-analyzer");
    }

    // ── Property-based tests ──

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn bin_name() -> impl Strategy<Value = String> {
            "[a-z][a-z0-9-]{0,19}".prop_filter("no trailing hyphen", |s| !s.ends_with('-'))
        }

        proptest! {
            #[test]
            fn validate_accepts_distinct_pairs(
                api_bin in bin_name(),
                an_bin in bin_name(),
                api_port in 1u16..,
                an_port in 1u16..,
            ) {
                prop_assume!(api_bin != an_bin);
                prop_assume!(api_port != an_port);
                let p = pair(&api_bin, api_port, &an_bin, an_port);
                prop_assert!(p.validate().is_ok());
            }

            #[test]
            fn missing_is_subset_of_catalog(
                built in proptest::collection::vec(bin_name(), 0..6),
            ) {
                let p = ServicePair::default();
                let cataloged = [p.api.binary.clone(), p.analyzer.binary.clone()];
                for (_, binary) in p.missing_binaries(&built) {
                    prop_assert!(cataloged.contains(&binary));
                }
            }

            #[test]
            fn built_binaries_never_reported_missing(
                extra in proptest::collection::vec(bin_name(), 0..4),
            ) {
                let p = ServicePair::default();
                let mut built = extra;
                built.push(p.api.binary.clone());
                built.push(p.analyzer.binary.clone());
                prop_assert!(p.missing_binaries(&built).is_empty());
            }
        }
    }
}
