//! Command rendering
//!
//! Turns one parameter tuple plus a replicate index into a shell line:
//!
//! ```text
//! <prefix> [-classpath "<cp>"] <program> <v1> ... <vn> [-quiet] [-seed N] >> <root><key><suffix>
//! ```
//!
//! The result redirection appends, so all replicates of a tuple accumulate
//! into one result file named by the tuple's derived key.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::model::{Command, ParameterTuple, ReplicateIndex};

pub const QUIET_FLAG: &str = "-quiet";
pub const SEED_FLAG: &str = "-seed";
pub const CLASSPATH_FLAG: &str = "-classpath";

/// Largest seed ever drawn. Seeds are uniform in `0..=SEED_MAX`, i.e. any
/// non-negative 64-bit signed integer, which a JVM `long` parses directly.
pub const SEED_MAX: u64 = i64::MAX as u64;

/// Whether each command carries its own random seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedMode {
    #[default]
    None,
    Random,
}

/// Everything the renderer needs besides the tuple itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Interpreter plus flags, passed through untouched (e.g. `java -Xmx16g`)
    pub invocation_prefix: String,
    /// Omitted from the command entirely when empty
    #[serde(default)]
    pub classpath_entries: Vec<String>,
    pub program: String,
    #[serde(default)]
    pub quiet: bool,
    #[serde(default)]
    pub seed_mode: SeedMode,
    pub output_root: String,
    #[serde(default)]
    pub output_suffix: String,
}

impl RenderConfig {
    /// Colon-joined classpath, if any entries are configured
    pub fn classpath(&self) -> Option<String> {
        if self.classpath_entries.is_empty() {
            None
        } else {
            Some(self.classpath_entries.join(":"))
        }
    }

    /// Everything up to and including the program identifier
    fn command_head(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(4);
        if !self.invocation_prefix.is_empty() {
            parts.push(self.invocation_prefix.clone());
        }
        if let Some(cp) = self.classpath() {
            parts.push(format!("{CLASSPATH_FLAG} \"{cp}\""));
        }
        parts.push(self.program.clone());
        parts.join(" ")
    }

    /// Result file a tuple's replicates append to
    pub fn output_path(&self, key: &str) -> String {
        format!("{}{}{}", self.output_root, key, self.output_suffix)
    }
}

/// Renders commands, drawing seeds from its own generator
pub struct CommandRenderer<R: Rng = StdRng> {
    config: RenderConfig,
    head: String,
    rng: R,
}

impl CommandRenderer<StdRng> {
    /// Renderer whose seeds come from OS entropy
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Renderer whose seed sequence is reproducible from `seed`
    #[must_use]
    pub fn with_seed(config: RenderConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> CommandRenderer<R> {
    pub fn with_rng(config: RenderConfig, rng: R) -> Self {
        let head = config.command_head();
        Self { config, head, rng }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render one command. Draws a fresh seed per call in `SeedMode::Random`.
    pub fn render(&mut self, tuple: &ParameterTuple, replicate: ReplicateIndex) -> Command {
        let key = tuple.derived_key();

        let mut line = self.head.clone();
        for value in tuple.values() {
            line.push(' ');
            line.push_str(value.as_str());
        }

        if self.config.quiet {
            line.push(' ');
            line.push_str(QUIET_FLAG);
        }

        if self.config.seed_mode == SeedMode::Random {
            let seed = self.rng.random_range(0..=SEED_MAX);
            line.push_str(&format!(" {SEED_FLAG} {seed}"));
        }

        line.push_str(" >> ");
        line.push_str(&self.config.output_path(&key));

        Command {
            line,
            key,
            replicate,
        }
    }

    /// Render every (tuple, replicate) pair in order
    pub fn render_all(&mut self, pairs: &[(ParameterTuple, ReplicateIndex)]) -> Vec<Command> {
        pairs
            .iter()
            .map(|(tuple, replicate)| self.render(tuple, *replicate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParamValue;

    fn cluster_config() -> RenderConfig {
        RenderConfig {
            invocation_prefix: "java -Xmx16g".to_string(),
            classpath_entries: vec!["../jointvetch/".to_string(), "../lib/mason.17.jar".to_string()],
            program: "jointvetch.HoltsCreek".to_string(),
            quiet: true,
            seed_mode: SeedMode::None,
            output_root: "results/".to_string(),
            output_suffix: ".txt".to_string(),
        }
    }

    fn tuple() -> ParameterTuple {
        ParameterTuple::new(vec![
            ParamValue::int(2),
            ParamValue::bool(true),
            ParamValue::float(0.0005),
            ParamValue::int(0),
        ])
    }

    #[test]
    fn test_render_with_classpath() {
        let mut renderer = CommandRenderer::with_seed(cluster_config(), 1);
        let cmd = renderer.render(&tuple(), ReplicateIndex(0));

        assert_eq!(
            cmd.line,
            "java -Xmx16g -classpath \"../jointvetch/:../lib/mason.17.jar\" jointvetch.HoltsCreek \
             2 true 0.0005 0 -quiet >> results/2_true_0.0005_0.txt"
        );
        assert_eq!(cmd.key, "2_true_0.0005_0");
    }

    #[test]
    fn test_render_without_classpath_omits_flag() {
        let config = RenderConfig {
            classpath_entries: vec![],
            output_suffix: String::new(),
            quiet: false,
            ..cluster_config()
        };
        let mut renderer = CommandRenderer::with_seed(config, 1);
        let cmd = renderer.render(&tuple(), ReplicateIndex(3));

        assert_eq!(
            cmd.line,
            "java -Xmx16g jointvetch.HoltsCreek 2 true 0.0005 0 >> results/2_true_0.0005_0"
        );
        assert!(!cmd.line.contains(CLASSPATH_FLAG));
    }

    #[test]
    fn test_render_deterministic_without_seed() {
        let mut a = CommandRenderer::new(cluster_config());
        let mut b = CommandRenderer::new(cluster_config());
        assert_eq!(
            a.render(&tuple(), ReplicateIndex(1)),
            b.render(&tuple(), ReplicateIndex(1))
        );
    }

    #[test]
    fn test_random_seed_differs_per_command() {
        let config = RenderConfig {
            seed_mode: SeedMode::Random,
            ..cluster_config()
        };
        let mut renderer = CommandRenderer::with_seed(config, 42);
        let first = renderer.render(&tuple(), ReplicateIndex(0));
        let second = renderer.render(&tuple(), ReplicateIndex(1));

        assert_ne!(first.line, second.line);
        assert_eq!(first.key, second.key);

        let seed_of = |line: &str| -> u64 {
            let mut parts = line.split_whitespace();
            parts.find(|p| *p == SEED_FLAG);
            parts.next().unwrap().parse().unwrap()
        };
        assert!(seed_of(&first.line) <= SEED_MAX);
        assert!(seed_of(&second.line) <= SEED_MAX);

        // Everything except the seed is identical
        let strip = |line: &str| -> String {
            let seed = seed_of(line).to_string();
            line.replacen(&seed, "", 1)
        };
        assert_eq!(strip(&first.line), strip(&second.line));
    }

    #[test]
    fn test_seeded_renderer_is_reproducible() {
        let config = RenderConfig {
            seed_mode: SeedMode::Random,
            ..cluster_config()
        };
        let mut a = CommandRenderer::with_seed(config.clone(), 7);
        let mut b = CommandRenderer::with_seed(config, 7);
        assert_eq!(
            a.render(&tuple(), ReplicateIndex(0)),
            b.render(&tuple(), ReplicateIndex(0))
        );
    }

    #[test]
    fn test_classpath_joined_with_colons() {
        assert_eq!(
            cluster_config().classpath().as_deref(),
            Some("../jointvetch/:../lib/mason.17.jar")
        );
        let none = RenderConfig {
            classpath_entries: vec![],
            ..cluster_config()
        };
        assert_eq!(none.classpath(), None);
    }
}
