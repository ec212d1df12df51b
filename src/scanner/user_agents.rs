//! User-agent rotation
//!
//! Each request picks a user agent uniformly at random from the pool. The
//! random source is injected so runs can be made reproducible.

use crate::target::read_list_file;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Used when no user agents could be loaded
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Non-empty set of user agents with a random picker
pub struct UserAgentPool {
    agents: Vec<String>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl UserAgentPool {
    /// Creates a pool seeded from OS entropy
    pub fn new(agents: Vec<String>) -> Self {
        Self::with_rng(agents, StdRng::from_entropy())
    }

    /// Creates a pool whose picks are reproducible for a given seed
    pub fn seeded(agents: Vec<String>, seed: u64) -> Self {
        Self::with_rng(agents, StdRng::seed_from_u64(seed))
    }

    /// Creates a pool drawing from the given random source
    ///
    /// Blank entries are dropped. If nothing is left the pool holds only
    /// `DEFAULT_USER_AGENT`.
    pub fn with_rng<R>(agents: Vec<String>, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        let mut agents: Vec<String> = agents
            .into_iter()
            .map(|agent| agent.trim().to_string())
            .filter(|agent| !agent.is_empty())
            .collect();

        if agents.is_empty() {
            tracing::warn!("No user agents loaded, using the default user agent");
            agents.push(DEFAULT_USER_AGENT.to_string());
        }

        Self {
            agents,
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Loads the pool from a newline-delimited file
    ///
    /// A missing or unreadable file is reported and the default user agent
    /// is used instead.
    pub fn from_file(path: &Path) -> Self {
        match read_list_file(path) {
            Ok(agents) => {
                tracing::info!("Loaded {} user agents from {}", agents.len(), path.display());
                Self::new(agents)
            }
            Err(e) => {
                tracing::error!("{}", e);
                Self::new(Vec::new())
            }
        }
    }

    /// Picks one user agent uniformly at random; never empty
    pub fn pick(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.agents
            .choose(&mut *rng)
            .cloned()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string())
    }

    /// The agents this pool draws from
    pub fn agents(&self) -> &[String] {
        &self.agents
    }
}

impl std::fmt::Debug for UserAgentPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAgentPool")
            .field("agents", &self.agents)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn agents() -> Vec<String> {
        vec![
            "AgentA/1.0".to_string(),
            "AgentB/2.0".to_string(),
            "AgentC/3.0".to_string(),
        ]
    }

    #[test]
    fn test_empty_pool_falls_back_to_default() {
        let pool = UserAgentPool::new(Vec::new());
        assert_eq!(pool.agents(), [DEFAULT_USER_AGENT.to_string()]);
        assert_eq!(pool.pick(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_blank_entries_are_dropped() {
        let pool = UserAgentPool::new(vec!["  ".to_string(), String::new()]);
        assert_eq!(pool.pick(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_pick_comes_from_pool() {
        let pool = UserAgentPool::new(agents());
        for _ in 0..50 {
            let agent = pool.pick();
            assert!(agents().contains(&agent));
        }
    }

    #[test]
    fn test_fixed_sequence_source() {
        // A source that always yields zero always selects the first entry
        let pool = UserAgentPool::with_rng(agents(), StepRng::new(0, 0));
        for _ in 0..10 {
            assert_eq!(pool.pick(), "AgentA/1.0");
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let first = UserAgentPool::seeded(agents(), 42);
        let second = UserAgentPool::seeded(agents(), 42);

        let a: Vec<String> = (0..20).map(|_| first.pick()).collect();
        let b: Vec<String> = (0..20).map(|_| second.pick()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_seeded_pool_eventually_uses_every_agent() {
        let pool = UserAgentPool::seeded(agents(), 7);
        let picked: std::collections::HashSet<String> = (0..200).map(|_| pool.pick()).collect();
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# agents\nFileAgent/1.0\n\nFileAgent/2.0").unwrap();

        let pool = UserAgentPool::from_file(file.path());
        assert_eq!(pool.agents(), ["FileAgent/1.0", "FileAgent/2.0"]);
    }

    #[test]
    fn test_from_missing_file_uses_default() {
        let pool = UserAgentPool::from_file(Path::new("/nonexistent/user-agents.txt"));
        assert_eq!(pool.pick(), DEFAULT_USER_AGENT);
    }
}
