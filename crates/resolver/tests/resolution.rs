use std::fs::{self, File};
use std::io::BufWriter;

use idexml_resolver::{
    read_doctype_from_path, DtdResolver, EntityResolver, ResolvedEntity,
};
use idexml_writer::{
    ExportConfig, TemplateDefinition, TemplateGroupDefinition, TemplatesWriter, WriteXml,
};
use tempfile::tempdir;

#[test]
fn falls_back_to_unversioned_dtd() {
    let dtds = tempdir().expect("tempdir");
    let unversioned = dtds.path().join("HighlightingStyles.dtd");
    fs::write(&unversioned, "<!ELEMENT HighlightingStyles ANY>").expect("write dtd");

    let resolver = DtdResolver::new(dtds.path());
    let resolved = resolver.resolve(None, "HighlightingStyles-4.3.dtd");
    assert_eq!(resolved, Some(ResolvedEntity::Local(unversioned)));
}

#[test]
fn prefers_exact_versioned_dtd() {
    let dtds = tempdir().expect("tempdir");
    let versioned = dtds.path().join("Templates-4.0.dtd");
    fs::write(&versioned, "").expect("write versioned");
    fs::write(dtds.path().join("Templates.dtd"), "").expect("write unversioned");

    let resolver = DtdResolver::new(dtds.path());
    assert_eq!(
        resolver.resolve(None, "Templates-4.0.dtd"),
        Some(ResolvedEntity::Local(versioned))
    );
}

#[test]
fn network_identifiers_are_returned_unchanged() {
    let resolver = DtdResolver::new("/nonexistent/dtd/dir");
    assert_eq!(
        resolver.resolve(None, "http://example.org/foo.dtd"),
        Some(ResolvedEntity::Remote("http://example.org/foo.dtd".into()))
    );
    assert_eq!(
        resolver.resolve_entity(Some("-//Example//DTD Foo//EN"), "http://example.org/foo.dtd"),
        "http://example.org/foo.dtd"
    );
}

#[test]
fn existing_literal_path_wins_over_dtd_directory() {
    let docs = tempdir().expect("tempdir");
    let dtds = tempdir().expect("tempdir");
    let literal = docs.path().join("UserProject-4.0.dtd");
    fs::write(&literal, "").expect("write literal");
    fs::write(dtds.path().join("UserProject-4.0.dtd"), "").expect("write dtd");

    let resolver = DtdResolver::new(dtds.path());
    let system_id = literal.to_str().unwrap();
    assert_eq!(
        resolver.resolve(None, system_id),
        Some(ResolvedEntity::Local(literal.clone()))
    );
}

#[test]
fn relative_literal_path_is_resolved_from_current_directory() {
    // Integration tests run with the package root as working directory.
    let dtds = tempdir().expect("tempdir");
    fs::write(dtds.path().join("Templates-4.0.dtd"), "").expect("write dtd");

    let resolver = DtdResolver::new(dtds.path());
    let system_id = "tests/fixtures/Templates-4.0.dtd";
    assert_eq!(
        resolver.resolve(None, system_id),
        Some(ResolvedEntity::Local(system_id.into()))
    );
    assert_eq!(resolver.resolve_entity(None, system_id), system_id);
}

#[test]
fn directory_part_of_identifier_is_dropped_for_dtd_lookup() {
    let dtds = tempdir().expect("tempdir");
    let installed = dtds.path().join("Shortcuts-3.6.dtd");
    fs::write(&installed, "").expect("write dtd");

    let resolver = DtdResolver::new(dtds.path());
    assert_eq!(
        resolver.resolve(None, "old/install/Shortcuts-3.6.dtd"),
        Some(ResolvedEntity::Local(installed))
    );
}

#[test]
fn unresolvable_identifier_yields_sentinel() {
    let dtds = tempdir().expect("tempdir");
    let resolver = DtdResolver::new(dtds.path());

    assert_eq!(resolver.resolve(None, "Session-4.3.dtd"), None);
    assert_eq!(resolver.resolve_entity(None, "Session-4.3.dtd"), "");
    assert_eq!(resolver.resolve_entity(None, ""), "");
}

#[test]
fn exported_document_doctype_resolves_against_installed_dtds() {
    let work = tempdir().expect("tempdir");
    let dtds = work.path().join("DTDs");
    fs::create_dir_all(&dtds).expect("create dtd dir");
    fs::write(dtds.join("Templates.dtd"), "<!ELEMENT Templates ANY>").expect("write dtd");

    let target = work.path().join("templates.e4c");
    let groups = vec![TemplateGroupDefinition::new("Rust", "Rust")
        .with_entry(TemplateDefinition::new("main", "entry point", "fn main() {}"))];
    let config = ExportConfig::default();
    {
        let file = File::create(&target).expect("create target");
        let mut writer = TemplatesWriter::new(BufWriter::new(file), &groups, &config);
        writer.write_xml().expect("write templates");
        writer
            .into_inner()
            .into_inner()
            .expect("flush templates");
    }

    let doctype = read_doctype_from_path(&target)
        .expect("read doctype")
        .expect("doctype present");
    assert_eq!(doctype.root, "Templates");
    assert_eq!(doctype.system_id.as_deref(), Some("Templates-4.0.dtd"));

    let resolver = DtdResolver::new(&dtds);
    assert_eq!(
        resolver.resolve_doctype(&doctype),
        Some(ResolvedEntity::Local(dtds.join("Templates.dtd")))
    );
}
