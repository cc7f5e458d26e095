//! Image recipe rendering and auditing.
//!
//! One generator renders all three recipes: the API image, the analyzer
//! image, and the stack image carrying both services plus the supervisor.
//! The audit half parses an existing Dockerfile back into [`DockerfileFacts`]
//! and checks it against the service catalog: exactly one `EXPOSE` on the
//! service's port, and a default command that runs the service's binary.

use parseo_core::{BuildConfig, DeployTarget, ServicePair};

/// Binary name of the dual-process supervisor shipped in the stack image.
pub const SUPERVISOR_BINARY: &str = "parseo-run";

/// Generates optimized multi-stage Dockerfiles using Cargo Chef.
pub struct DockerfileGenerator<'a> {
    config: &'a BuildConfig,
    services: &'a ServicePair,
}

impl<'a> DockerfileGenerator<'a> {
    pub fn new(config: &'a BuildConfig, services: &'a ServicePair) -> Self {
        Self { config, services }
    }

    /// The binaries a recipe builds and ships, entry binary first.
    fn binaries(&self, target: DeployTarget) -> Vec<&str> {
        match target {
            DeployTarget::Api => vec![self.services.api.binary.as_str()],
            DeployTarget::Analyzer => vec![self.services.analyzer.binary.as_str()],
            DeployTarget::Stack => vec![
                SUPERVISOR_BINARY,
                self.services.api.binary.as_str(),
                self.services.analyzer.binary.as_str(),
            ],
        }
    }

    /// The port a recipe advertises.
    pub fn port(&self, target: DeployTarget) -> u16 {
        match target {
            DeployTarget::Api | DeployTarget::Stack => self.services.api.port,
            DeployTarget::Analyzer => self.services.analyzer.port,
        }
    }

    /// The recipe's default command: the entry binary by itself.
    pub fn entry_binary(&self, target: DeployTarget) -> &str {
        match target {
            DeployTarget::Api => &self.services.api.binary,
            DeployTarget::Analyzer => &self.services.analyzer.binary,
            DeployTarget::Stack => SUPERVISOR_BINARY,
        }
    }

    pub fn render(&self, target: DeployTarget) -> String {
        let binaries = self.binaries(target);

        let extra_packages = if self.config.extra_packages.is_empty() {
            String::new()
        } else {
            format!(
                "RUN apt-get update && apt-get install -y {} && rm -rf /var/lib/apt/lists/*\n",
                self.config.extra_packages.join(" ")
            )
        };

        let bin_flags = binaries
            .iter()
            .map(|b| format!("--bin {b}"))
            .collect::<Vec<_>>()
            .join(" ");

        let binary_copies = binaries
            .iter()
            .map(|b| format!("COPY --from=builder /app/target/release/{b} /usr/local/bin/{b}\n"))
            .collect::<String>();

        let runtime_content = match &self.config.include {
            None => String::new(),
            Some(paths) => paths
                .iter()
                .map(|p| {
                    let trimmed = p.trim_end_matches('/');
                    format!("COPY {trimmed}/ ./{trimmed}/\n")
                })
                .collect(),
        };

        let env_directives = {
            // BTreeMap ordering keeps renders reproducible
            let sorted: std::collections::BTreeMap<_, _> = self.config.env.iter().collect();
            sorted
                .iter()
                .map(|(k, v)| format!("ENV {k}={v}\n"))
                .collect::<String>()
        };

        format!(
            r#"# === Base: cargo-chef installed once ===
FROM {base} AS chef
RUN cargo install cargo-chef --version {chef_version} --locked
WORKDIR /app

# === Stage 1: Planner ===
FROM chef AS planner
COPY . .
RUN cargo chef prepare --recipe-path recipe.json

# === Stage 2: Cacher (dependency build) ===
FROM chef AS cacher
{extra_packages}COPY --from=planner /app/recipe.json recipe.json
RUN cargo chef cook --release --recipe-path recipe.json

# === Stage 3: Builder ===
FROM chef AS builder
{extra_packages}COPY --from=cacher /app/target target
COPY --from=cacher /usr/local/cargo /usr/local/cargo
COPY . .
RUN cargo build --release {bin_flags}

# === Stage 4: Runtime ===
FROM {runtime}
WORKDIR /app
{binary_copies}{runtime_content}{env_directives}EXPOSE {port}
CMD ["{entry}"]
"#,
            base = self.config.base_image,
            chef_version = self.config.cargo_chef_version,
            runtime = self.config.runtime_image,
            port = self.port(target),
            entry = self.entry_binary(target),
        )
    }
}

// ── Parsing and auditing ──

/// The default command a Dockerfile declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageCommand {
    /// Exec form: `CMD ["prog", "arg"]`, possibly prefixed by an
    /// exec-form ENTRYPOINT.
    Exec(Vec<String>),
    /// Shell form: `CMD prog arg`.
    Shell(String),
}

impl ImageCommand {
    /// The command as words, shell form split on whitespace.
    pub fn words(&self) -> Vec<String> {
        match self {
            Self::Exec(words) => words.clone(),
            Self::Shell(line) => line.split_whitespace().map(str::to_owned).collect(),
        }
    }
}

/// What an existing Dockerfile declares, extracted for auditing.
#[derive(Debug, Clone, Default)]
pub struct DockerfileFacts {
    /// Every FROM image, in order
    pub base_images: Vec<String>,
    /// Every EXPOSE port that parsed as a number
    pub exposed_ports: Vec<u16>,
    /// EXPOSE values that did not parse
    pub unparsable_ports: Vec<String>,
    /// Exec-form ENTRYPOINT, if declared
    pub entrypoint: Vec<String>,
    /// The last CMD instruction, if any
    pub command: Option<ImageCommand>,
}

impl DockerfileFacts {
    /// Extract FROM/EXPOSE/ENTRYPOINT/CMD facts from Dockerfile text.
    ///
    /// Later CMD/ENTRYPOINT instructions override earlier ones, the way the
    /// container runtime treats them. Backslash continuations are joined
    /// before scanning; comment lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut facts = Self::default();

        for line in logical_lines(text) {
            let Some((instruction, rest)) = line.split_once(char::is_whitespace) else {
                continue;
            };
            let rest = rest.trim();
            match instruction.to_ascii_uppercase().as_str() {
                "FROM" => {
                    // "image [AS name]"; platform flags precede the image
                    let image = rest
                        .split_whitespace()
                        .find(|w| !w.starts_with("--"))
                        .unwrap_or_default();
                    if !image.is_empty() {
                        facts.base_images.push(image.to_owned());
                    }
                }
                "EXPOSE" => {
                    for port_spec in rest.split_whitespace() {
                        // "8080" or "8080/tcp"
                        let number = port_spec.split('/').next().unwrap_or(port_spec);
                        match number.parse::<u16>() {
                            Ok(port) => facts.exposed_ports.push(port),
                            Err(_) => facts.unparsable_ports.push(port_spec.to_owned()),
                        }
                    }
                }
                "ENTRYPOINT" => {
                    if let Some(words) = parse_exec_form(rest) {
                        facts.entrypoint = words;
                    } else {
                        // Shell-form ENTRYPOINT discards CMD; model it as the command
                        facts.entrypoint.clear();
                        facts.command = Some(ImageCommand::Shell(rest.to_owned()));
                    }
                }
                "CMD" => {
                    facts.command = Some(match parse_exec_form(rest) {
                        Some(words) => ImageCommand::Exec(words),
                        None => ImageCommand::Shell(rest.to_owned()),
                    });
                }
                _ => {}
            }
        }

        facts
    }

    /// The command the image runs by default: exec-form ENTRYPOINT with CMD
    /// appended as arguments, or CMD alone.
    pub fn default_command(&self) -> Option<ImageCommand> {
        match (&self.entrypoint[..], &self.command) {
            ([], None) => None,
            ([], Some(cmd)) => Some(cmd.clone()),
            (entry, cmd) => {
                let mut words = entry.to_vec();
                if let Some(cmd) = cmd {
                    words.extend(cmd.words());
                }
                Some(ImageCommand::Exec(words))
            }
        }
    }

    /// Check the recipe against what a service image must declare:
    /// exactly one EXPOSE equal to `port`, and a default command that runs
    /// `binary` with no arguments.
    pub fn audit(&self, binary: &str, port: u16) -> Vec<DockerfileIssue> {
        let mut issues = Vec::new();

        for raw in &self.unparsable_ports {
            issues.push(DockerfileIssue::UnparsablePort { raw: raw.clone() });
        }

        match self.exposed_ports.as_slice() {
            [] => issues.push(DockerfileIssue::MissingExpose { expected: port }),
            [found] => {
                if *found != port {
                    issues.push(DockerfileIssue::WrongPort {
                        expected: port,
                        found: *found,
                    });
                }
            }
            many => issues.push(DockerfileIssue::MultipleExpose {
                ports: many.to_vec(),
            }),
        }

        match self.default_command() {
            None => issues.push(DockerfileIssue::MissingCommand {
                expected: binary.to_owned(),
            }),
            Some(cmd) => {
                let words = cmd.words();
                // The binary may be invoked by bare name or absolute path
                let runs_binary = words.len() == 1
                    && (words[0] == binary
                        || std::path::Path::new(&words[0])
                            .file_name()
                            .is_some_and(|f| f == binary));
                if !runs_binary {
                    issues.push(DockerfileIssue::WrongCommand {
                        expected: binary.to_owned(),
                        found: words.join(" "),
                    });
                }
            }
        }

        issues
    }
}

/// A way a recipe deviates from what its service must declare.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DockerfileIssue {
    #[error("no EXPOSE instruction; expected EXPOSE {expected}")]
    MissingExpose { expected: u16 },

    #[error("multiple EXPOSE ports {ports:?}; a service image advertises exactly one")]
    MultipleExpose { ports: Vec<u16> },

    #[error("EXPOSE {found} does not match the service port {expected}")]
    WrongPort { expected: u16, found: u16 },

    #[error("EXPOSE value {raw:?} is not a port number")]
    UnparsablePort { raw: String },

    #[error("no CMD or ENTRYPOINT; expected the image to run '{expected}'")]
    MissingCommand { expected: String },

    #[error("default command '{found}' does not run '{expected}'")]
    WrongCommand { expected: String, found: String },
}

/// Join backslash continuations and drop comments/blank lines.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for raw in text.lines() {
        let trimmed = raw.trim();
        if trimmed.starts_with('#') {
            continue;
        }
        if let Some(stripped) = trimmed.strip_suffix('\\') {
            current.push_str(stripped);
            current.push(' ');
            continue;
        }
        current.push_str(trimmed);
        if !current.trim().is_empty() {
            lines.push(std::mem::take(&mut current));
        } else {
            current.clear();
        }
    }
    if !current.trim().is_empty() {
        lines.push(current);
    }

    lines
}

/// Parse `["a", "b"]` exec form; None means shell form.
fn parse_exec_form(rest: &str) -> Option<Vec<String>> {
    let trimmed = rest.trim();
    if !trimmed.starts_with('[') {
        return None;
    }
    // arch-lint: allow(no-silent-result-drop) reason="invalid JSON after '[' means the instruction is shell form, not an error"
    serde_json::from_str::<Vec<String>>(trimmed).ok()
}
