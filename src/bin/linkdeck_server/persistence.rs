use super::*;

const TREE_FILE: &str = "tree.json";
const TREE_VERSION: u32 = 1;

#[derive(serde::Deserialize)]
struct TreeFile {
    version: u32,
    #[serde(flatten)]
    tree: Tree,
}

#[derive(serde::Serialize)]
struct TreeFileRef<'a> {
    version: u32,
    #[serde(flatten)]
    tree: &'a Tree,
}

pub(super) fn load_tree_from_disk(data_dir: &std::path::Path) -> Result<Tree> {
    let path = data_dir.join(TREE_FILE);
    if !path.exists() {
        return Ok(Tree::default());
    }
    let bytes = std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
    let file: TreeFile =
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))?;
    if file.version != TREE_VERSION {
        anyhow::bail!(
            "unsupported tree file version {} in {}",
            file.version,
            path.display()
        );
    }
    Ok(file.tree)
}

pub(super) fn persist_tree(data_dir: &std::path::Path, tree: &Tree) -> Result<()> {
    let file = TreeFileRef {
        version: TREE_VERSION,
        tree,
    };
    let bytes = serde_json::to_vec_pretty(&file).context("serialize tree")?;
    write_atomic_overwrite(&data_dir.join(TREE_FILE), &bytes)
}

pub(super) fn write_atomic_overwrite(path: &std::path::Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    std::fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
