//! End-to-end: collect then generate against a real temp project, and check
//! that every image URL written into a page names a file the collector placed.
//!
//! Run with: cargo test --test pipeline

use docimg::annotate::{AnnotateOptions, annotate_markdown, image_destinations};
use docimg::collect::collect;
use docimg::config::{self, DocsConfig};
use docimg::generate::generate;
use docimg::imaging::RustBackend;
use docimg::render::{ImageAttrs, render_image};
use docimg::scan::scan;
use image::RgbImage;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn png(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::new(width, height).save(path).unwrap();
}

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        &root.join("docs/a/b.mdx"),
        "# Page B\n\n![x](../img/x.png)\n\n![local](./img/local.png)\n",
    );
    write(
        &root.join("docs/deep/er/page.mdx"),
        "# Deep\n\n![y](../../img/y.png)\n\n![logo](/logo.png)\n\n![r](http://example.com/x.png)\n",
    );
    png(&root.join("docs/img/x.png"), 300, 150);
    png(&root.join("docs/a/img/local.png"), 10, 20);
    png(&root.join("docs/img/y.png"), 7, 3);
    png(&root.join("public/logo.png"), 200, 100);
    tmp
}

#[test]
fn annotated_urls_point_at_collected_files() {
    let tmp = project();
    let root = tmp.path();
    let config = DocsConfig::default();
    let paths = config.paths(root);
    let manifest = scan(&paths.docs_dir, &config).unwrap();

    let report = collect(&manifest, &paths.assets_dir, &config.collect.bulk_prefix, None).unwrap();
    assert!(report.missing.is_empty());

    let backend = RustBackend::new();
    for document in &manifest.documents {
        let source = fs::read_to_string(&document.path).unwrap();
        let options = AnnotateOptions::for_document(
            &document.path,
            &paths.docs_dir,
            &paths.public_dir,
            &config.asset_prefix,
        );
        let events = annotate_markdown(&source, &options, &backend).unwrap();
        for dest in image_destinations(&events) {
            if dest.starts_with("http") {
                continue;
            }
            let served = dest.split('#').next().unwrap();
            let on_disk = paths.public_dir.join(served.trim_start_matches('/'));
            assert!(on_disk.is_file(), "{dest} has no file at {}", on_disk.display());
        }
    }
}

#[test]
fn build_produces_sized_pages() {
    let tmp = project();
    let root = tmp.path();
    let config = config::load_config(root).unwrap();
    let paths = config.paths(root);
    let manifest = scan(&paths.docs_dir, &config).unwrap();

    collect(&manifest, &paths.assets_dir, &config.collect.bulk_prefix, None).unwrap();
    let pages = generate(&manifest, &paths, &config.asset_prefix, &RustBackend::new()).unwrap();
    assert_eq!(pages.len(), 2);

    let b = fs::read_to_string(paths.site_dir.join("a/b.html")).unwrap();
    assert!(b.contains(r#"src="/mdx-images/img-x.png#300x150""#));
    assert!(b.contains(r#"src="/mdx-images/a-img-local.png#10x20""#));

    let deep = fs::read_to_string(paths.site_dir.join("deep/er/page.html")).unwrap();
    assert!(deep.contains(r#"src="/mdx-images/img-y.png#7x3""#));
    assert!(deep.contains(r#"href="/logo.png""#));
    assert!(deep.contains(r#"width="200""#));
    assert!(deep.contains(r#"<img src="http://example.com/x.png""#));

    // collected images are served alongside the pages
    assert!(paths.site_dir.join("mdx-images/img-x.png").is_file());
    assert!(paths.site_dir.join("mdx-images/a-img-local.png").is_file());
}

#[test]
fn custom_prefix_flows_through_collect_and_annotate() {
    let tmp = project();
    let root = tmp.path();
    write(&root.join("docimg.toml"), "asset_prefix = \"/static/shots\"\n");
    let config = config::load_config(root).unwrap();
    let paths = config.paths(root);
    assert_eq!(paths.assets_dir, root.join("public/static/shots"));

    let manifest = scan(&paths.docs_dir, &config).unwrap();
    collect(&manifest, &paths.assets_dir, &config.collect.bulk_prefix, None).unwrap();
    assert!(paths.assets_dir.join("img-x.png").is_file());

    generate(&manifest, &paths, &config.asset_prefix, &RustBackend::new()).unwrap();
    let b = fs::read_to_string(paths.site_dir.join("a/b.html")).unwrap();
    assert!(b.contains(r#"href="/static/shots/img-x.png""#));
}

#[test]
fn renderer_reads_annotator_output() {
    let html = render_image(
        Some("/mdx-images/foo.png#300x150"),
        &ImageAttrs::with_alt("Foo"),
    )
    .into_string();
    assert!(html.starts_with(r#"<a href="/mdx-images/foo.png""#));
    assert!(html.contains(r#"width="300""#));
    assert!(html.contains(r#"height="150""#));
}
