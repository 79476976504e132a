use crate::model::Manager;
use crate::platform::Environment;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct YarnScanner;

#[async_trait]
impl super::Scanner for YarnScanner {
    fn name(&self) -> &'static str {
        "Yarn Cache"
    }

    fn manager(&self) -> Manager {
        Manager::Yarn
    }

    fn candidate_roots(&self, env: &Environment) -> Vec<PathBuf> {
        let Some(home) = env.home() else {
            return Vec::new();
        };

        let mut roots = vec![
            home.join(".yarn-cache"),
            home.join(".cache").join("yarn"),
            home.join("Library").join("Caches").join("Yarn"),
        ];

        if let Some(cache) = env.yarn_cache_dir() {
            roots.push(cache.to_path_buf());
        }

        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;

    #[test]
    fn test_default_roots() {
        let roots = YarnScanner.candidate_roots(&Environment::with_home("/home/me"));

        assert_eq!(
            roots,
            vec![
                PathBuf::from("/home/me/.yarn-cache"),
                PathBuf::from("/home/me/.cache/yarn"),
                PathBuf::from("/home/me/Library/Caches/Yarn"),
            ]
        );
    }

    #[test]
    fn test_cache_folder_is_added_not_substituted() {
        let env = Environment::with_home("/home/me").yarn_cache_folder("/srv/yarn");
        let roots = YarnScanner.candidate_roots(&env);

        assert_eq!(roots.len(), 4);
        assert!(roots.contains(&PathBuf::from("/home/me/.cache/yarn")));
        assert_eq!(roots[3], PathBuf::from("/srv/yarn"));
    }
}
