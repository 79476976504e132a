use crate::model::Manager;
use crate::platform::Environment;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct NpmScanner;

/// System-wide global `node_modules` directories.
const GLOBAL_MODULE_DIRS: [&str; 3] = [
    "/opt/node22/lib/node_modules",
    "/usr/local/lib/node_modules",
    "/usr/lib/node_modules",
];

#[async_trait]
impl super::Scanner for NpmScanner {
    fn name(&self) -> &'static str {
        "npm Cache and Global Packages"
    }

    fn manager(&self) -> Manager {
        Manager::Npm
    }

    fn candidate_roots(&self, env: &Environment) -> Vec<PathBuf> {
        let Some(home) = env.home() else {
            return Vec::new();
        };

        let mut roots = vec![home.join(".npm")];
        roots.extend(GLOBAL_MODULE_DIRS.iter().map(PathBuf::from));

        // `npm config set prefix` installs globals under <prefix>/lib/node_modules
        if let Some(prefix) = env.npm_prefix_dir() {
            roots.push(prefix.join("lib").join("node_modules"));
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
        let roots = NpmScanner.candidate_roots(&Environment::with_home("/home/me"));

        assert_eq!(
            roots,
            vec![
                PathBuf::from("/home/me/.npm"),
                PathBuf::from("/opt/node22/lib/node_modules"),
                PathBuf::from("/usr/local/lib/node_modules"),
                PathBuf::from("/usr/lib/node_modules"),
            ]
        );
    }

    #[test]
    fn test_prefix_adds_global_dir() {
        let env = Environment::with_home("/home/me").npm_prefix("/home/me/.npm-global");
        let roots = NpmScanner.candidate_roots(&env);

        assert_eq!(roots.len(), 5);
        assert_eq!(
            roots.last(),
            Some(&PathBuf::from("/home/me/.npm-global/lib/node_modules"))
        );
    }

    #[test]
    fn test_prefix_matching_system_dir_is_listed_as_given() {
        let env = Environment::with_home("/home/me").npm_prefix("/usr/local");
        let roots = NpmScanner.candidate_roots(&env);

        assert_eq!(roots.len(), 5);
        assert_eq!(roots[2], roots[4]);
    }

    #[test]
    fn test_prefix_overlapping_default_root_is_scanned_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let home = dir.path().join("home");
        let manifest = home.join(".npm/lib/node_modules/left-pad/package.json");
        std::fs::create_dir_all(manifest.parent().unwrap()).unwrap();
        std::fs::write(&manifest, r#"{"name":"left-pad","version":"1.3.0"}"#).unwrap();

        let env = Environment::with_home(&home).npm_prefix(home.join(".npm"));
        let roots = NpmScanner.candidate_roots(&env);
        let scan = crate::scanner::scan_roots(Manager::Npm, &roots);

        let ours: Vec<_> = scan
            .records
            .iter()
            .filter(|r| r.cache_path().starts_with(&home))
            .collect();
        assert_eq!(ours.len(), 1);
        assert_eq!(ours[0].cache_path(), manifest);
    }
}
