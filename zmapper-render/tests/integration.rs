use zmapper_core::{Complex, Formula, GridSpec, ParamValues, SliderRange, ViewState};
use zmapper_render::{
    export_png, find_zeros_along_path, rasterize, ExportMetadata, MappingScene, RenderBuffer,
};

fn small_grid() -> GridSpec {
    GridSpec {
        horizontal_lines: 6,
        vertical_lines: 8,
        points_per_line: 64,
        ..GridSpec::default()
    }
}

#[test]
fn end_to_end_scene_to_image() {
    let mut scene = MappingScene::new("a*sin(w*z) + c", small_grid(), SliderRange::default())
        .expect("scene should build");
    scene.set_parameter("c", Complex::new(0.5, 0.0));
    let frame = scene.on_state_changed().expect("frame").clone();

    assert_eq!(frame.output.lines.len(), frame.input.lines.len());
    assert_eq!(frame.non_finite, 0);

    let view = ViewState::new(Complex::ZERO, 0.01, 200, 150).unwrap();
    let image = rasterize(&frame.output, &view, 1.0).unwrap();
    assert_eq!(image.pixels().len(), 200 * 150 * 4);
    let has_ink = image
        .pixels()
        .chunks_exact(4)
        .any(|px| px[0] < 250 || px[1] < 250 || px[2] < 250);
    assert!(has_ink, "mapped grid should leave marks on the white canvas");
}

#[test]
fn rendering_is_deterministic() {
    let mut a = MappingScene::new("exp(z)", small_grid(), SliderRange::default()).unwrap();
    let mut b = MappingScene::new("exp(z)", small_grid(), SliderRange::default()).unwrap();
    let view = ViewState::new(Complex::ONE, 0.02, 128, 96).unwrap();
    let ia = rasterize(&a.on_state_changed().unwrap().output, &view, 1.5).unwrap();
    let ib = rasterize(&b.on_state_changed().unwrap().output, &view, 1.5).unwrap();
    assert_eq!(ia.pixels(), ib.pixels(), "renders must be deterministic");
}

#[test]
fn reciprocal_grid_through_the_pole() {
    // The default grid has a line through the origin.
    let spec = GridSpec {
        horizontal_lines: 5,
        vertical_lines: 5,
        points_per_line: 101,
        ..GridSpec::default()
    };
    let mut scene = MappingScene::new("1/z", spec, SliderRange::default()).unwrap();
    let frame = scene.on_state_changed().unwrap().clone();
    let view = ViewState::new(Complex::ZERO, 0.05, 160, 160).unwrap();
    let image = rasterize(&frame.output, &view, 1.0).unwrap();
    assert_eq!(image.width(), 160);
}

#[test]
fn first_zeta_zeros_on_critical_line() {
    let zeta = Formula::parse("zeta(z)").unwrap().compile().unwrap();
    let t: Vec<f64> = (0..=2000).map(|i| 10.0 + 20.0 * i as f64 / 2000.0).collect();
    let zeros = find_zeros_along_path(
        &t,
        |s| Complex::new(0.5, s),
        &zeta,
        &ParamValues::new(),
        1e-6,
    );
    let expected = [14.134725, 21.022040, 25.010858];
    assert_eq!(zeros.len(), expected.len(), "zeros found: {zeros:?}");
    for (z, e) in zeros.iter().zip(expected) {
        assert!((z - e).abs() < 1e-5, "{z} vs {e}");
    }
}

#[test]
fn exported_figure_round_trips_dimensions() {
    let mut scene = MappingScene::new("z^2", small_grid(), SliderRange::default()).unwrap();
    let frame = scene.on_state_changed().unwrap().clone();
    let view = ViewState::new(Complex::ZERO, 0.02, 90, 60).unwrap();
    let image: RenderBuffer = rasterize(&frame.output, &view, 1.0).unwrap();

    let dir = std::env::temp_dir().join("zmapper_integration_export");
    let _ = std::fs::create_dir_all(&dir);
    let path = dir.join("figure.png");
    let mut meta = ExportMetadata::new(
        scene.formula().source(),
        scene.params().values(),
        scene.grid().extent,
    );
    meta.view = Some(view.visible_rect());
    export_png(&image, &path, &meta).expect("export should succeed");

    let decoder = png::Decoder::new(std::fs::File::open(&path).unwrap());
    let reader = decoder.read_info().unwrap();
    assert_eq!(reader.info().width, 90);
    assert_eq!(reader.info().height, 60);
    assert!(reader
        .info()
        .uncompressed_latin1_text
        .iter()
        .any(|t| t.keyword == "Title" && t.text == "f(z) = z^2"));

    let _ = std::fs::remove_dir_all(&dir);
}
