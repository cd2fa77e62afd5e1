use fecviz_core::{
    filter_category, load_records, to_svg, write_svg, ContributionRecord, Dispatch, HistogramView,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_fixture(suffix: &str, body: &str) -> NamedTempFile {
    let mut tmp = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    tmp.write_all(body.as_bytes()).unwrap();
    tmp.flush().unwrap();
    tmp
}

#[test]
fn csv_fixture_renders_to_svg() {
    let tmp = write_fixture(".csv", "state,amount\nCA,10\nCA,10\nNY,600\n");
    let records = load_records(tmp.path()).unwrap();
    let mut view = HistogramView::new("#histogram", Dispatch::detached());
    view.render(&records);
    let svg = to_svg(view.surface());
    assert_eq!(svg.matches(r#"class="bar""#).count(), 9);
    assert!(svg.contains(r##"fill="#ff9933""##));
    assert!(svg.contains(r#"class="x axis""#));
    assert!(svg.contains(">$1M</text>"));
}

#[test]
fn json_fixture_filters_by_state() {
    let tmp = write_fixture(".json", r#"[{"state":"CA","amount":75},{"state":"NY","amount":20000}]"#);
    let records = load_records(tmp.path()).unwrap();
    let ny = filter_category(&records, Some("NY"));
    let mut view = HistogramView::new("#histogram", Dispatch::detached());
    view.render(&ny);
    let counts: Vec<u64> = view.bins().iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![0, 0, 0, 0, 0, 1, 0, 0, 0]);
}

#[test]
fn unsupported_extension_is_error() {
    let tmp = write_fixture(".txt", "state,amount\n");
    assert!(load_records(tmp.path()).is_err());
}

#[test]
fn write_svg_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("hist.svg");
    let mut view = HistogramView::new("#histogram", Dispatch::detached());
    view.render(&[ContributionRecord::new("TX", 250.0)]);
    write_svg(view.surface(), &out).unwrap();
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("<svg"));
}

#[test]
fn same_first_record_and_length_share_signature_only_in_legacy_mode() {
    use fecviz_common::{CachePolicy, HistogramConfig};
    let a = vec![ContributionRecord::new("CA", 10.0), ContributionRecord::new("CA", 20.0)];
    let b = vec![ContributionRecord::new("CA", 10.0), ContributionRecord::new("CA", 5000.0)];

    let legacy = HistogramConfig { cache_policy: CachePolicy::FirstRecord, ..Default::default() };
    let mut v = HistogramView::with_config("#h", Dispatch::detached(), legacy).unwrap();
    v.render(&a);
    let first = v.scale_state().cloned();
    v.render(&b);
    assert_eq!(v.scale_state().cloned(), first);

    let mut v = HistogramView::new("#h", Dispatch::detached());
    v.render(&a);
    let first = v.scale_state().cloned();
    v.render(&b);
    assert_ne!(v.scale_state().cloned(), first);
}
