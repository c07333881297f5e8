//! Contract Invariant Tests
//!
//! End-to-end conversions over the SVG fixtures in `tests/data`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use svg2layout::{
    dedup::find_replacements,
    document::{Circle, Document, Layer, Rect, Shape},
    layout::{ComponentType, Vec2},
    ConversionPipeline, ConvertError, ConverterConfig, CanvasSize,
    canonical_json, layout_digest,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

fn fixtures() -> Vec<PathBuf> {
    vec![fixture("desc.svg"), fixture("menu.svg")]
}

#[test]
fn invariant_single_page_components() {
    let doc = Document {
        width: 1024.0,
        height: 613.0,
        stylesheets: vec![".common { fill:#ffffff }".to_string()],
        layers: vec![Layer {
            shapes: vec![
                Shape::Rect(Rect {
                    x: 10.0,
                    y: 20.0,
                    width: 5.0,
                    height: 6.0,
                    class: "common".to_string(),
                    ..Default::default()
                }),
                Shape::Circle(Circle { cx: 1.0, cy: 2.0, r: 3.0, ..Default::default() }),
            ],
        }],
        ..Default::default()
    };

    let documents = BTreeMap::from([("page".to_string(), doc)]);
    let layout = ConversionPipeline::default().compile(&documents).unwrap();
    let components = &layout.pages["page"].components;

    assert_eq!(components.len(), 2);
    assert_eq!(components[0].kind, ComponentType::Box);
    assert_eq!(components[0].pos1, Vec2::new(10.0, 20.0));
    assert_eq!(components[0].pos2, Some(Vec2::new(15.0, 26.0)));
    assert_eq!(components[0].corner_radius, None);
    assert_eq!(components[1].kind, ComponentType::Circle);
    assert_eq!(components[1].pos1, Vec2::new(1.0, 2.0));
    assert_eq!(components[1].radius, Some(3.0));
    assert_ne!(components[0].style, components[1].style);
    assert!(layout.dangling_styles().is_empty());
}

#[test]
fn invariant_fixture_pages() {
    let pipeline = ConversionPipeline::default();
    let documents = pipeline.load_documents(&fixtures()).unwrap();
    let layout = pipeline.compile(&documents).unwrap();

    assert_eq!(layout.pages.keys().collect::<Vec<_>>(), vec!["desc", "menu"]);

    let desc = &layout.pages["desc"].components;
    assert_eq!(desc.len(), 5);
    assert_eq!(
        desc.iter().map(|c| c.layer).collect::<Vec<_>>(),
        vec![1, 1, 1, 1, 2]
    );

    let rect = &desc[0];
    assert_eq!(rect.corner_radius, Some(5.0));
    assert_eq!(
        rect.bindings["pos1"],
        "$vec2(path{gauge/fuel:value}:init{(248,611)}:interval{0.1}:percent{(248,2)})"
    );

    let text = &desc[3];
    assert_eq!(text.kind, ComponentType::Text);
    assert_eq!(text.text.as_deref(), Some("Fuel"));
    assert_eq!(text.font.as_deref(), Some("Montserrat-Bold-16"));
    assert_eq!(text.bindings["text"], "$str(path{gauge/fuel:label})");

    // Unknown families fall back to the default font.
    assert_eq!(desc[4].font.as_deref(), Some("RobotoMono-10"));

    assert_eq!(
        layout.fonts.keys().collect::<Vec<_>>(),
        vec!["Montserrat-Bold-16", "RobotoMono-10"]
    );
}

#[test]
fn invariant_styles_deduplicated_across_pages() {
    let pipeline = ConversionPipeline::default();
    let documents = pipeline.load_documents(&fixtures()).unwrap();
    let layout = pipeline.compile(&documents).unwrap();

    assert_eq!(
        layout.styles.keys().collect::<Vec<_>>(),
        vec!["desc-circle-2", "desc-common", "desc-outline", "desc-text-3", "desc-text-4"]
    );

    let style_of = |page: &str, i: usize| layout.pages[page].components[i].style.clone().unwrap();
    assert_eq!(style_of("desc", 0), "desc-common");
    assert_eq!(style_of("desc", 1), "desc-common");
    assert_eq!(style_of("desc", 2), "desc-circle-2");
    assert_eq!(style_of("menu", 0), "desc-common");
    assert_eq!(style_of("menu", 1), "desc-circle-2");

    assert!(layout.dangling_styles().is_empty());

    let common = ["desc-common", "desc-outline", "menu-common"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert!(find_replacements(&layout, &common).is_empty());
}

#[test]
fn invariant_binding_overrides_in_output() {
    let pipeline = ConversionPipeline::default();
    let documents = pipeline.load_documents(&fixtures()).unwrap();
    let layout = pipeline.compile(&documents).unwrap();

    let json = serde_json::to_value(&layout).unwrap();
    let desc = &json["pages"]["desc"]["components"];

    assert_eq!(
        desc[0]["pos1"],
        "$vec2(path{gauge/fuel:value}:init{(248,611)}:interval{0.1}:percent{(248,2)})"
    );
    assert_eq!(desc[0]["pos2"], "(15.000,26.000)");
    assert_eq!(desc[0]["corner_radius"], 5.0);
    assert_eq!(desc[2]["style"], "$str(path{gauge/fuel:style})");
    assert_eq!(desc[3]["text"], "$str(path{gauge/fuel:label})");
    assert_eq!(desc[3]["font"], "Montserrat-Bold-16");
    assert_eq!(desc[1]["visible"], true);
    assert!(desc[1].get("radius").is_none());

    assert_eq!(json["fonts"]["RobotoMono-10"], serde_json::json!({"font": "RobotoMono", "size": 10}));
    assert_eq!(json["styles"]["desc-common"]["fill"], "r0.157,g0.655,b0.271,a0.550");
}

#[test]
fn invariant_output_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    let pipeline = ConversionPipeline::default();
    let s1 = pipeline.convert_files(&fixtures(), &first).unwrap();
    let mut reversed = fixtures();
    reversed.reverse();
    let s2 = pipeline.convert_files(&reversed, &second).unwrap();

    let bytes1 = std::fs::read(&first).unwrap();
    let bytes2 = std::fs::read(&second).unwrap();
    assert_eq!(bytes1, bytes2);
    assert_eq!(s1.digest, s2.digest);
    assert_eq!(s1.pages, vec!["desc", "menu"]);
    assert_eq!(s1.styles, 5);
    assert_eq!(s1.fonts, 2);

    let documents = pipeline.load_documents(&fixtures()).unwrap();
    let layout = pipeline.compile(&documents).unwrap();
    assert_eq!(canonical_json(&layout).unwrap().into_bytes(), bytes1);
    assert_eq!(layout_digest(&layout).unwrap(), s1.digest);
}

#[test]
fn invariant_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("layout.json");

    let inputs = vec![fixture("desc.svg"), fixture("wide.svg")];
    let err = ConversionPipeline::default().convert_files(&inputs, &output).unwrap_err();

    assert!(matches!(err, ConvertError::CanvasMismatch { .. }));
    assert!(err.to_string().contains("wide"));
    assert!(!output.exists());
}

#[test]
fn invariant_numeric_errors_name_the_page() {
    let page = |style: &str| Document {
        width: 1024.0,
        height: 613.0,
        layers: vec![Layer {
            shapes: vec![Shape::Rect(Rect { style: style.to_string(), ..Default::default() })],
        }],
        ..Default::default()
    };
    let documents = BTreeMap::from([
        ("fuel".to_string(), page("fill:#000000")),
        ("gauges".to_string(), page("fill:#000000;fill-opacity:.")),
    ]);

    let err = ConversionPipeline::default().compile(&documents).unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, ConvertError::NumericParse { .. }));
    assert!(msg.contains("gauges"), "{}", msg);
    assert!(msg.contains("gauges-box-0"), "{}", msg);
    assert!(!msg.contains("fuel"), "{}", msg);
}

#[test]
fn invariant_configured_canvas() {
    let config = ConverterConfig {
        canvas: CanvasSize { width: 1920.0, height: 1080.0 },
    };
    let pipeline = ConversionPipeline::new(config);
    let documents = pipeline.load_documents(&[fixture("wide.svg")]).unwrap();
    let layout = pipeline.compile(&documents).unwrap();
    assert_eq!(layout.pages["wide"].components.len(), 1);
}

#[test]
fn invariant_missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ConversionPipeline::default()
        .convert_files(&[fixture("missing.svg")], &dir.path().join("out.json"));
    assert!(matches!(result, Err(ConvertError::Io(_))));
}
