//! Traversal root resolution: local directories and remote Git clones.

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{FetchOptions, Repository};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Parsed form of the ROOT argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootSpec {
    Local(PathBuf),
    Remote { url: String, branch: Option<String> },
}

impl RootSpec {
    /// Remote when `spec` looks like a Git URL; a trailing `@branch` is split
    /// off when it contains neither `/` nor `:`.
    pub fn parse(spec: &str) -> Self {
        if let Some((url, branch)) = spec.rsplit_once('@') {
            if !branch.is_empty()
                && !branch.contains('/')
                && !branch.contains(':')
                && is_remote_url(url)
            {
                return RootSpec::Remote { url: url.to_string(), branch: Some(branch.to_string()) };
            }
        }
        if is_remote_url(spec) {
            return RootSpec::Remote { url: spec.to_string(), branch: None };
        }
        RootSpec::Local(PathBuf::from(spec))
    }
}

fn is_remote_url(spec: &str) -> bool {
    const SCHEMES: &[&str] = &["https://", "http://", "ssh://", "git://", "file://"];
    SCHEMES.iter().any(|scheme| spec.starts_with(scheme))
        || (spec.starts_with("git@") && spec.contains(':'))
}

/// A local directory to walk. Clones are removed when this is dropped.
#[derive(Debug)]
pub struct ResolvedRoot {
    path: PathBuf,
    clone_dir: Option<TempDir>,
}

impl ResolvedRoot {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_clone(&self) -> bool {
        self.clone_dir.is_some()
    }
}

/// Turn the ROOT argument into a walkable directory.
///
/// `ref_override` replaces any `@branch` suffix on a remote spec and is
/// ignored for local paths.
pub fn resolve(spec: &str, ref_override: Option<&str>) -> Result<ResolvedRoot> {
    match RootSpec::parse(spec) {
        RootSpec::Local(path) => {
            if !path.exists() {
                return Err(Error::RootNotFound(path));
            }
            if !path.is_dir() {
                return Err(Error::NotADirectory(path));
            }
            Ok(ResolvedRoot { path, clone_dir: None })
        }
        RootSpec::Remote { url, branch } => {
            let branch = ref_override.map(str::to_string).or(branch);
            clone_repository(&url, branch.as_deref())
        }
    }
}

fn clone_repository(url: &str, reference: Option<&str>) -> Result<ResolvedRoot> {
    let dir = tempfile::Builder::new().prefix("repo-to-md-").tempdir().map_err(Error::TempDir)?;
    info!(url, reference = reference.unwrap_or("<default>"), dest = %dir.path().display(), "Cloning repository");

    let to_clone_error = |source: git2::Error| Error::Clone { url: url.to_string(), source };
    // libgit2's local transport cannot do shallow fetches
    let shallow = !url.starts_with("file://");

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options(shallow));
    let repo = builder.clone(url, dir.path()).map_err(to_clone_error)?;
    if let Some(reference) = reference {
        checkout_reference(&repo, reference, shallow).map_err(to_clone_error)?;
    }

    Ok(ResolvedRoot { path: dir.path().to_path_buf(), clone_dir: Some(dir) })
}

fn fetch_options(shallow: bool) -> FetchOptions<'static> {
    let mut fetch = FetchOptions::new();
    if shallow {
        fetch.depth(1);
    }
    fetch
}

/// Detach the work tree at `reference`: a remote branch, then a tag, then
/// any revision `git rev-parse` understands.
fn checkout_reference(
    repo: &Repository,
    reference: &str,
    shallow: bool,
) -> std::result::Result<(), git2::Error> {
    let branch = format!("refs/remotes/origin/{reference}");
    let tag = format!("refs/tags/{reference}");

    let object = match repo.revparse_single(&branch) {
        Ok(object) => object,
        Err(_) => {
            if repo.revparse_single(&tag).is_err() {
                // clone only follows tags reachable from the fetched branches
                let refspec = format!("+{tag}:{tag}");
                let mut remote = repo.find_remote("origin")?;
                let mut fetch = fetch_options(shallow);
                if let Err(err) = remote.fetch(&[refspec.as_str()], Some(&mut fetch), None) {
                    debug!(reference, error = %err, "No such tag on origin");
                }
            }
            repo.revparse_single(&tag).or_else(|_| repo.revparse_single(reference))?
        }
    };

    let commit = object.peel_to_commit()?;
    repo.checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().force()))?;
    repo.set_head_detached(commit.id())?;
    debug!(reference, commit = %commit.id(), "Checked out reference");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use std::fs;

    #[test]
    fn local_paths_stay_local() {
        assert_eq!(RootSpec::parse("./repo"), RootSpec::Local(PathBuf::from("./repo")));
        assert_eq!(RootSpec::parse("me@laptop"), RootSpec::Local(PathBuf::from("me@laptop")));
    }

    #[test]
    fn https_url_with_branch_suffix() {
        assert_eq!(
            RootSpec::parse("https://github.com/org/repo@develop"),
            RootSpec::Remote {
                url: "https://github.com/org/repo".to_string(),
                branch: Some("develop".to_string()),
            }
        );
    }

    #[test]
    fn scp_style_url_keeps_user_part() {
        assert_eq!(
            RootSpec::parse("git@github.com:org/repo.git"),
            RootSpec::Remote { url: "git@github.com:org/repo.git".to_string(), branch: None }
        );
        assert_eq!(
            RootSpec::parse("git@github.com:org/repo.git@v1.2"),
            RootSpec::Remote {
                url: "git@github.com:org/repo.git".to_string(),
                branch: Some("v1.2".to_string()),
            }
        );
    }

    #[test]
    fn userinfo_is_not_a_branch() {
        assert_eq!(
            RootSpec::parse("https://user@host.example/org/repo"),
            RootSpec::Remote { url: "https://user@host.example/org/repo".to_string(), branch: None }
        );
    }

    #[test]
    fn missing_local_root_is_reported() {
        let dir = TempDir::new().expect("tempdir");
        let missing = dir.path().join("nope");
        let err = resolve(missing.to_str().expect("utf8"), None).expect_err("should fail");
        assert!(matches!(err, Error::RootNotFound(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn file_root_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let file = dir.path().join("a.txt");
        fs::write(&file, "x").expect("write");
        let err = resolve(file.to_str().expect("utf8"), None).expect_err("should fail");
        assert!(matches!(err, Error::NotADirectory(_)));
    }

    fn commit_file(repo: &Repository, content: &str, message: &str) -> git2::Oid {
        let workdir = repo.workdir().expect("workdir");
        fs::write(workdir.join("a.py"), content).expect("write");
        let mut index = repo.index().expect("index");
        index.add_path(Path::new("a.py")).expect("add");
        index.write().expect("write index");
        let tree = repo.find_tree(index.write_tree().expect("tree")).expect("find tree");
        let sig = Signature::now("Test", "test@example.com").expect("sig");
        let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents).expect("commit")
    }

    #[test]
    fn clone_from_local_repository_and_cleanup_on_drop() {
        let origin = TempDir::new().expect("origin");
        let repo = Repository::init(origin.path()).expect("init");
        commit_file(&repo, "print(1)", "init");

        let url = format!("file://{}", origin.path().display());
        let resolved = resolve(&url, None).expect("clone");
        assert!(resolved.is_clone());
        assert_eq!(fs::read_to_string(resolved.path().join("a.py")).expect("read"), "print(1)");

        let clone_path = resolved.path().to_path_buf();
        drop(resolved);
        assert!(!clone_path.exists());
    }

    #[test]
    fn ref_may_name_a_tag_or_a_branch() {
        let origin = TempDir::new().expect("origin");
        let repo = Repository::init(origin.path()).expect("init");
        let first = commit_file(&repo, "version = 1", "first");
        let first = repo.find_commit(first).expect("find commit");
        repo.tag_lightweight("v1", first.as_object(), false).expect("tag");
        repo.branch("release/1.x", &first, false).expect("branch");
        commit_file(&repo, "version = 2", "second");

        let url = format!("file://{}", origin.path().display());
        let read = |reference: Option<&str>| {
            let resolved = resolve(&url, reference).expect("clone");
            fs::read_to_string(resolved.path().join("a.py")).expect("read")
        };
        assert_eq!(read(None), "version = 2");
        assert_eq!(read(Some("v1")), "version = 1");
        assert_eq!(read(Some("release/1.x")), "version = 1");
    }

    #[test]
    fn unknown_ref_is_a_clone_error() {
        let origin = TempDir::new().expect("origin");
        let repo = Repository::init(origin.path()).expect("init");
        commit_file(&repo, "print(1)", "init");

        let url = format!("file://{}", origin.path().display());
        let err = resolve(&url, Some("no-such-ref")).expect_err("should fail");
        assert!(matches!(err, Error::Clone { .. }));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn clone_failure_is_a_clone_error() {
        let dir = TempDir::new().expect("tempdir");
        let url = format!("file://{}", dir.path().join("not-a-repo").display());
        let err = resolve(&url, None).expect_err("should fail");
        assert!(matches!(err, Error::Clone { .. }));
        assert_eq!(err.exit_code(), 5);
    }
}
