use include_dir::{include_dir, Dir};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::app_dirs::AppDirs;

static BUNDLED: Dir = include_dir!("$CARGO_MANIFEST_DIR/res");

/// The kinds of resource tt can look up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    Themes,
    Quotes,
    Words,
}

/// Find a resource by name.
///
/// `-` reads standard input. Otherwise `name` is tried as a path, then as
/// `<config dir>/<kind>/<name>` for every config dir, and finally among the
/// resources compiled into the binary.
pub fn read_resource(kind: ResourceKind, name: &str) -> io::Result<Option<Vec<u8>>> {
    if name == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(Some(buf));
    }

    if let Ok(bytes) = fs::read(name) {
        return Ok(Some(bytes));
    }

    for dir in AppDirs::config_dirs() {
        if let Ok(bytes) = fs::read(dir.join(kind.to_string()).join(name)) {
            tracing::debug!(%kind, name, dir = %dir.display(), "resource found in config dir");
            return Ok(Some(bytes));
        }
    }

    Ok(read_bundled(kind, name).map(<[u8]>::to_vec))
}

/// Look up a resource compiled into the binary.
pub fn read_bundled(kind: ResourceKind, name: &str) -> Option<&'static [u8]> {
    BUNDLED
        .get_file(Path::new(&kind.to_string()).join(name))
        .map(|file| file.contents())
}

/// Names of the bundled resources of one kind, sorted.
pub fn list(kind: ResourceKind) -> Vec<String> {
    let mut names: Vec<String> = BUNDLED
        .get_dir(kind.to_string())
        .map(|dir| {
            dir.files()
                .filter_map(|file| file.path().file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
