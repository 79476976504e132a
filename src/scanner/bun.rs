use crate::model::Manager;
use crate::platform::Environment;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct BunScanner;

#[async_trait]
impl super::Scanner for BunScanner {
    fn name(&self) -> &'static str {
        "Bun Install Cache"
    }

    fn manager(&self) -> Manager {
        Manager::Bun
    }

    fn candidate_roots(&self, env: &Environment) -> Vec<PathBuf> {
        let Some(home) = env.home() else {
            return Vec::new();
        };

        let install = home.join(".bun").join("install");
        vec![
            install.join("cache"),
            install.join("global"),
            home.join(".cache").join(".bun").join("install").join("cache"),
        ]
    }
}
