//! Shared test utilities.
//!
//! Builds a small project tree in a temp directory with real PNG files, so
//! tests exercise actual dimension reads without checked-in binary fixtures.
//!
//! ```text
//! <tmp>/
//! ├── docs/
//! │   ├── a/b.mdx              ![X marks](../img/x.png)
//! │   ├── guides/
//! │   │   ├── setup.mdx        ![Step one](./img/step-1.png "First step"), ../img/x.png
//! │   │   └── img/step-1.png   120x80
//! │   ├── img/
//! │   │   ├── x.png            300x150
//! │   │   ├── logo.PNG         40x40
//! │   │   └── notes.txt
//! │   └── intro.md             /logo.png, https://example.com/r.png
//! └── public/
//!     └── logo.png             200x100
//! ```

use image::RgbImage;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write a solid PNG of the given size, creating parent directories.
pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbImage::new(width, height).save(path).unwrap();
}

/// Write a text file, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Build the standard project tree described in the module docs.
pub fn setup_docs() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let docs = root.join("docs");

    write_file(&docs.join("a/b.mdx"), "# B\n\n![X marks](../img/x.png)\n");
    write_file(
        &docs.join("guides/setup.mdx"),
        "# Setup\n\n![Step one](./img/step-1.png \"First step\")\n\nSee ![overview](../img/x.png).\n",
    );
    write_file(
        &docs.join("intro.md"),
        "# Intro\n\n![Logo](/logo.png)\n\n![Remote](https://example.com/r.png)\n",
    );
    write_file(&docs.join("img/notes.txt"), "not an image");

    write_png(&docs.join("img/x.png"), 300, 150);
    write_png(&docs.join("img/logo.PNG"), 40, 40);
    write_png(&docs.join("guides/img/step-1.png"), 120, 80);
    write_png(&root.join("public/logo.png"), 200, 100);

    tmp
}

/// Names of all files directly inside `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
