use icon_compositor::{ActionData, Icon, Layer, LayerKind, Settings, TileGrid};
use rstest::rstest;

const RED: [u8; 4] = [255, 0, 0, 255];
const CLEAR: [u8; 4] = [0, 0, 0, 0];

fn settings() -> Settings {
    Settings {
        load_system_fonts: false,
        ..Settings::default()
    }
}

/// Icon of the given size built from `(kind, fields)` pairs.
fn icon(width: u32, height: u32, layers: &[(LayerKind, &[(&str, &str)])]) -> Icon {
    let mut icon = Icon::new("test", &settings());
    icon.set_size(width, height);
    for (kind, fields) in layers {
        let data = ActionData::from_pairs(fields.iter().copied());
        icon.push_layer_from_action(*kind, &mut data.cursor());
    }
    icon
}

const RED_FILL: &[(&str, &str)] = &[("srect_fill", "#ff0000"), ("srect_stroke", "none")];

async fn pixels(icon: &mut Icon, points: &[(u32, u32)]) -> Vec<[u8; 4]> {
    let canvas = icon.draw().await.unwrap();
    points
        .iter()
        .map(|&(x, y)| canvas.pixel(x, y).unwrap())
        .collect()
}

#[tokio::test]
async fn test_clip_then_fill() {
    let mut icon = icon(
        100,
        100,
        &[
            (LayerKind::RectanglePath, &[("rect_size", "50%")]),
            (LayerKind::ClippingMask, &[]),
            (LayerKind::StyledRectangle, RED_FILL),
        ],
    );
    assert_eq!(pixels(&mut icon, &[(50, 50), (5, 5)]).await, vec![RED, CLEAR]);
}

#[tokio::test]
async fn test_inverse_clip() {
    let mut icon = icon(
        100,
        100,
        &[
            (LayerKind::RectanglePath, &[("rect_size", "50%")]),
            (LayerKind::ClippingMask, &[("clip_action", "inverse")]),
            (LayerKind::StyledRectangle, RED_FILL),
        ],
    );
    assert_eq!(pixels(&mut icon, &[(50, 50), (5, 5)]).await, vec![CLEAR, RED]);
}

#[tokio::test]
async fn test_release_clip() {
    let mut icon = icon(
        100,
        100,
        &[
            (LayerKind::RectanglePath, &[("rect_size", "50%")]),
            (LayerKind::ClippingMask, &[]),
            (LayerKind::ClippingMask, &[("clip_action", "release")]),
            (LayerKind::StyledRectangle, RED_FILL),
        ],
    );
    assert_eq!(pixels(&mut icon, &[(50, 50), (5, 5)]).await, vec![RED, RED]);
}

#[rstest]
#[case::union("union", [RED, CLEAR, RED])]
#[case::add("add", [RED, CLEAR, RED])]
#[case::intersect("intersect", [CLEAR, CLEAR, CLEAR])]
#[case::difference("difference", [RED, CLEAR, CLEAR])]
#[case::complement("complement", [CLEAR, CLEAR, RED])]
#[case::xor("xor", [RED, CLEAR, RED])]
#[tokio::test]
async fn test_path_operations(#[case] op: &str, #[case] expected: [[u8; 4]; 3]) {
    let mut icon = icon(
        100,
        100,
        &[
            (
                LayerKind::RectanglePath,
                &[("rect_size", "25%,100%"), ("rect_align", "left")],
            ),
            (
                LayerKind::RectanglePath,
                &[
                    ("rect_size", "25%,100%"),
                    ("rect_align", "right"),
                    ("rect_op", op),
                ],
            ),
            (LayerKind::ClippingMask, &[]),
            (LayerKind::StyledRectangle, RED_FILL),
        ],
    );
    let got = pixels(&mut icon, &[(10, 50), (50, 50), (90, 50)]).await;
    assert_eq!(got, expected.to_vec());
}

#[tokio::test]
async fn test_ellipse_hole() {
    let mut icon = icon(
        100,
        100,
        &[
            (LayerKind::RectanglePath, &[]),
            (
                LayerKind::EllipsePath,
                &[("ellipse_size", "50%"), ("ellipse_op", "difference")],
            ),
            (LayerKind::ClippingMask, &[]),
            (LayerKind::StyledRectangle, RED_FILL),
        ],
    );
    assert_eq!(pixels(&mut icon, &[(50, 50), (3, 3)]).await, vec![CLEAR, RED]);
}

#[tokio::test]
async fn test_previous_one_moves_path() {
    let mut icon = icon(
        100,
        100,
        &[
            (
                LayerKind::RectanglePath,
                &[("rect_size", "50%"), ("rect_align", "top left")],
            ),
            (LayerKind::Transform, &[("tx_trsX", "50")]),
            (LayerKind::ClippingMask, &[]),
            (LayerKind::StyledRectangle, RED_FILL),
        ],
    );
    assert_eq!(pixels(&mut icon, &[(25, 25), (75, 25)]).await, vec![CLEAR, RED]);
}

#[tokio::test]
async fn test_until_reset_bracket() {
    let mut icon = icon(
        100,
        100,
        &[
            (
                LayerKind::Transform,
                &[("tx_trsY", "50"), ("tx_scope", "untilReset")],
            ),
            (
                LayerKind::StyledRectangle,
                &[
                    ("srect_size", "50%"),
                    ("srect_align", "top left"),
                    ("srect_fill", "#ff0000"),
                    ("srect_stroke", "none"),
                ],
            ),
            (LayerKind::Transform, &[("tx_scope", "reset")]),
            (
                LayerKind::StyledRectangle,
                &[
                    ("srect_size", "50%"),
                    ("srect_align", "top right"),
                    ("srect_fill", "#ff0000"),
                    ("srect_stroke", "none"),
                ],
            ),
        ],
    );
    let got = pixels(&mut icon, &[(25, 25), (25, 75), (75, 25), (75, 75)]).await;
    assert_eq!(got, vec![CLEAR, RED, RED, CLEAR]);
}

#[tokio::test]
async fn test_empty_slots_are_skipped() {
    let mut icon = icon(
        100,
        100,
        &[
            (
                LayerKind::RectanglePath,
                &[("rect_size", "50%"), ("rect_align", "top left")],
            ),
            (LayerKind::Transform, &[("tx_trsX", "50")]),
            (LayerKind::ClippingMask, &[]),
            (LayerKind::StyledRectangle, RED_FILL),
        ],
    );
    // Emptying the transform slot leaves the path where it was drawn.
    icon.remove_layer(1);
    assert_eq!(pixels(&mut icon, &[(25, 25), (75, 25)]).await, vec![RED, CLEAR]);

    icon.set_layer(1, Some(Layer::from_action(
        LayerKind::Transform,
        &mut ActionData::from_pairs([("tx_trsX", "50")]).cursor(),
        &Default::default(),
    )));
    assert_eq!(pixels(&mut icon, &[(25, 25), (75, 25)]).await, vec![CLEAR, RED]);
}

#[tokio::test]
async fn test_update_layer_between_renders() {
    let mut icon = icon(50, 50, &[(LayerKind::StyledRectangle, RED_FILL)]);
    assert_eq!(pixels(&mut icon, &[(25, 25)]).await, vec![RED]);

    let consumed = icon.update_layer(
        0,
        &ActionData::from_pairs([("srect_fill", "#0000ff"), ("gauge_value", "3")]),
    );
    assert_eq!(consumed, 1);
    assert_eq!(pixels(&mut icon, &[(25, 25)]).await, vec![[0, 0, 255, 255]]);
}

#[tokio::test]
async fn test_ticks_reuse_cache_between_renders() {
    let mut icon = icon(
        80,
        80,
        &[(
            LayerKind::CircularTicks,
            &[("cticks_majTicksCount", "12"), ("cticks_minTicksCount", "60")],
        )],
    );
    let generation = |icon: &Icon| match &icon.layers()[0] {
        Some(Layer::CircularTicks(ticks)) => ticks.generation(),
        other => panic!("unexpected layer {other:?}"),
    };

    let first = icon.render().await;
    let second = icon.render().await;
    assert_eq!(first, second);
    assert_eq!(generation(&icon), 1);

    icon.update_layer(0, &ActionData::from_pairs([("cticks_majTicksCount", "6")]));
    let third = icon.render().await;
    assert_ne!(third, first);
    assert_eq!(generation(&icon), 2);

    icon.set_size(60, 60);
    icon.render().await;
    assert_eq!(generation(&icon), 3);
}

#[tokio::test]
async fn test_gauge_and_bar_render() {
    let mut icon = icon(
        64,
        64,
        &[
            (LayerKind::RoundProgressGauge, &[("gauge_value", "75")]),
            (
                LayerKind::BarGraph,
                &[("bar_value", "10"), ("bar_value", "90"), ("bar_color", "#00ff00")],
            ),
        ],
    );
    let images = icon.render().await;
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].id, "test");

    // Newest bar is flush with the right edge and 90% tall.
    let [r, g, b, a] = pixels(&mut icon, &[(62, 32)]).await[0];
    assert_eq!((r, g, b, a), (0, 255, 0, 255));
}

#[rstest]
#[case(TileGrid::new(2, 2), &["test_1_1", "test_2_1", "test_1_2", "test_2_2"])]
#[case(TileGrid::new(4, 1), &["test_1_1", "test_2_1", "test_3_1", "test_4_1"])]
#[tokio::test]
async fn test_tiled_output(#[case] grid: TileGrid, #[case] ids: &[&str]) {
    let mut icon = icon(64, 64, &[(LayerKind::StyledRectangle, RED_FILL)]);
    icon.set_tiles(grid);
    let images = icon.render().await;
    let got: Vec<&str> = images.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(got, ids);

    let decoded = image::load_from_memory(&images[0].png).unwrap();
    assert_eq!(
        (decoded.width(), decoded.height()),
        (64 / grid.cols, 64 / grid.rows)
    );
}

#[tokio::test]
async fn test_file_image_layer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("red.png");
    image::RgbaImage::from_pixel(32, 32, image::Rgba([255, 0, 0, 255]))
        .save(&path)
        .unwrap();

    let mut icon = icon(
        32,
        32,
        &[(LayerKind::DynamicImage, &[("img_src", path.to_str().unwrap())])],
    );
    assert_eq!(pixels(&mut icon, &[(16, 16)]).await, vec![RED]);

    let missing = dir.path().join("missing.png");
    icon.update_layer(
        0,
        &ActionData::from_pairs([("img_src", missing.to_str().unwrap())]),
    );
    assert_eq!(pixels(&mut icon, &[(16, 16)]).await, vec![CLEAR]);
}

#[tokio::test]
async fn test_text_and_labels_without_fonts_render_blank() {
    let mut icon = icon(
        40,
        40,
        &[
            (LayerKind::StyledText, &[("text_text", "42")]),
            (
                LayerKind::CircularTicks,
                &[("cticks_labels", "0,50,100"), ("cticks_labelFont", "12px sans-serif")],
            ),
        ],
    );
    let images = icon.render().await;
    assert_eq!(images.len(), 1);
    let decoded = image::load_from_memory(&images[0].png).unwrap().to_rgba8();
    assert!(decoded.pixels().all(|p| p.0 == CLEAR));
}
