use crate::model::Manager;
use crate::platform::Environment;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct DenoScanner;

#[async_trait]
impl super::Scanner for DenoScanner {
    fn name(&self) -> &'static str {
        "Deno Cache"
    }

    fn manager(&self) -> Manager {
        Manager::Deno
    }

    /// Unlike the other managers, `DENO_DIR` replaces the default cache
    /// location instead of adding to it.
    fn candidate_roots(&self, env: &Environment) -> Vec<PathBuf> {
        let Some(home) = env.home() else {
            return Vec::new();
        };

        let deno_dir = env
            .deno_cache_dir()
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".cache").join("deno"));

        vec![deno_dir.join("npm"), deno_dir.join("deps").join("https")]
    }
}
