use crate::model::Manager;
use crate::platform::Environment;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct PnpmScanner;

#[async_trait]
impl super::Scanner for PnpmScanner {
    fn name(&self) -> &'static str {
        "pnpm Store"
    }

    fn manager(&self) -> Manager {
        Manager::Pnpm
    }

    fn candidate_roots(&self, env: &Environment) -> Vec<PathBuf> {
        let Some(home) = env.home() else {
            return Vec::new();
        };

        let mut roots = vec![
            home.join(".pnpm-store"),
            home.join(".local").join("share").join("pnpm").join("store"),
            home.join("Library").join("pnpm").join("store"),
        ];

        if let Some(pnpm_home) = env.pnpm_home_dir() {
            roots.push(pnpm_home.join("store"));
        }

        roots
    }
}
