mod utils;

use utils::{max_channel_diff, pixel, render, TreeBuilder};

fn shapes_document() -> rsvg_render::Document {
    let mut tree = TreeBuilder::new("40", "40");
    tree.open("g", &[("transform", "translate(2.5 3)")])
        .leaf(
            "rect",
            &[("x", "1"), ("y", "1"), ("width", "20"), ("height", "12"), ("fill", "red")],
        )
        .leaf(
            "circle",
            &[
                ("cx", "20"),
                ("cy", "20"),
                ("r", "9.5"),
                ("fill", "blue"),
                ("fill-opacity", "0.5"),
                ("stroke", "lime"),
                ("stroke-width", "2"),
            ],
        )
        .close()
        .leaf(
            "ellipse",
            &[("cx", "10"), ("cy", "30"), ("rx", "8"), ("ry", "4"), ("fill", "black")],
        );
    tree.build()
}

// Shapes on whole pixels, so that no pixel is partially covered.  The group is drawn where
// nothing is behind it, and a translucent rect goes over everything afterwards.
fn pixel_aligned_document() -> rsvg_render::Document {
    let mut tree = TreeBuilder::new("40", "40");
    tree.leaf(
        "rect",
        &[("x", "2"), ("y", "2"), ("width", "14"), ("height", "30"), ("fill", "black")],
    )
    .open("g", &[("transform", "translate(20 4)")])
    .leaf("rect", &[("width", "12"), ("height", "12"), ("fill", "red")])
    .leaf(
        "rect",
        &[
            ("x", "6"),
            ("y", "6"),
            ("width", "12"),
            ("height", "20"),
            ("fill", "blue"),
            ("fill-opacity", "0.5"),
        ],
    )
    .close()
    .leaf(
        "rect",
        &[
            ("x", "8"),
            ("y", "10"),
            ("width", "24"),
            ("height", "24"),
            ("fill", "lime"),
            ("fill-opacity", "0.25"),
        ],
    );
    tree.build()
}

#[test]
fn offscreen_layers_are_identical_to_direct_drawing_on_whole_pixels() {
    let doc = pixel_aligned_document();

    let mut direct = render(&doc, 40, 40, false).unwrap();
    let mut layered = render(&doc, 40, 40, true).unwrap();

    assert_eq!(max_channel_diff(&mut direct, &mut layered), 0);

    // Make sure that the comparison is not between two empty surfaces.
    let p = pixel(&mut direct, 28, 14);
    assert!(p.r > 0 && p.b > 0 && p.g > 0 && p.a == 255);
}

// Antialiased edges are rounded once more when a partially covered pixel goes through an
// intermediate surface, so they may differ by one unit from direct drawing.
#[test]
fn offscreen_layers_look_like_direct_drawing_on_antialiased_shapes() {
    let doc = shapes_document();

    let mut direct = render(&doc, 40, 40, false).unwrap();
    let mut layered = render(&doc, 40, 40, true).unwrap();

    assert!(max_channel_diff(&mut direct, &mut layered) <= 1);
}

#[test]
fn group_opacity_does_not_accumulate() {
    let mut tree = TreeBuilder::new("10", "10");
    tree.open("g", &[("opacity", "0.5")])
        .leaf("rect", &[("width", "10"), ("height", "10"), ("fill", "black")])
        .leaf("rect", &[("width", "5"), ("height", "10"), ("fill", "black")])
        .close();
    let doc = tree.build();

    let mut surface = render(&doc, 10, 10, false).unwrap();

    let overlapped = pixel(&mut surface, 2, 5).a;
    let single = pixel(&mut surface, 7, 5).a;

    assert_eq!(overlapped, single);
    assert!((127..=128).contains(&overlapped));
}

#[test]
fn clip_path_in_user_space() {
    let mut tree = TreeBuilder::new("10", "10");
    tree.open("clipPath", &[("id", "c")])
        .leaf("rect", &[("width", "5"), ("height", "10")])
        .close()
        .leaf(
            "rect",
            &[("width", "10"), ("height", "10"), ("clip-path", "url(#c)")],
        );
    let doc = tree.build();

    let mut surface = render(&doc, 10, 10, false).unwrap();

    assert_eq!(pixel(&mut surface, 2, 5).a, 255);
    assert_eq!(pixel(&mut surface, 7, 5).a, 0);
}

#[test]
fn clip_path_in_object_bounding_box() {
    let mut tree = TreeBuilder::new("20", "10");
    tree.open("clipPath", &[("id", "c"), ("clipPathUnits", "objectBoundingBox")])
        .leaf("rect", &[("width", "0.5"), ("height", "1")])
        .close()
        .leaf(
            "rect",
            &[
                ("x", "10"),
                ("width", "10"),
                ("height", "10"),
                ("clip-path", "url(#c)"),
            ],
        );
    let doc = tree.build();

    let mut surface = render(&doc, 20, 10, false).unwrap();

    assert_eq!(pixel(&mut surface, 2, 5).a, 0);
    assert_eq!(pixel(&mut surface, 12, 5).a, 255);
    assert_eq!(pixel(&mut surface, 17, 5).a, 0);
}

#[test]
fn clip_path_to_missing_element_is_ignored() {
    let mut tree = TreeBuilder::new("10", "10");
    tree.leaf(
        "rect",
        &[("width", "10"), ("height", "10"), ("clip-path", "url(#nonexistent)")],
    );
    let doc = tree.build();

    let mut surface = render(&doc, 10, 10, false).unwrap();

    assert_eq!(pixel(&mut surface, 7, 5).a, 255);
}

#[test]
fn luminance_mask() {
    let mut tree = TreeBuilder::new("10", "10");
    tree.open("mask", &[("id", "m"), ("maskUnits", "userSpaceOnUse")])
        .leaf("rect", &[("width", "5"), ("height", "10"), ("fill", "white")])
        .leaf(
            "rect",
            &[("x", "5"), ("width", "5"), ("height", "10"), ("fill", "black")],
        )
        .close()
        .leaf(
            "rect",
            &[("width", "10"), ("height", "10"), ("fill", "blue"), ("mask", "url(#m)")],
        );
    let doc = tree.build();

    let mut surface = render(&doc, 10, 10, false).unwrap();

    let shown = pixel(&mut surface, 2, 5);
    assert!(shown.a >= 254);
    assert!(shown.b >= 254);

    assert_eq!(pixel(&mut surface, 7, 5).a, 0);
}

#[test]
fn mask_combines_with_opacity() {
    let mut tree = TreeBuilder::new("10", "10");
    tree.open("mask", &[("id", "m")])
        .leaf("rect", &[("width", "10"), ("height", "10"), ("fill", "white")])
        .close()
        .leaf(
            "rect",
            &[
                ("width", "10"),
                ("height", "10"),
                ("opacity", "0.5"),
                ("mask", "url(#m)"),
            ],
        );
    let doc = tree.build();

    let mut surface = render(&doc, 10, 10, false).unwrap();

    assert!((126..=128).contains(&pixel(&mut surface, 5, 5).a));
}

#[test]
fn mask_referencing_itself_is_drawn_without_the_inner_mask() {
    let mut tree = TreeBuilder::new("10", "10");
    tree.open("mask", &[("id", "m"), ("maskUnits", "userSpaceOnUse")])
        .leaf(
            "rect",
            &[("width", "10"), ("height", "10"), ("fill", "white"), ("mask", "url(#m)")],
        )
        .close()
        .leaf(
            "rect",
            &[("width", "10"), ("height", "10"), ("mask", "url(#m)")],
        );
    let doc = tree.build();

    let mut surface = render(&doc, 10, 10, false).unwrap();

    assert!(pixel(&mut surface, 5, 5).a >= 254);
}

#[test]
fn mask_to_element_of_wrong_type_is_ignored() {
    let mut tree = TreeBuilder::new("10", "10");
    tree.leaf("rect", &[("id", "notamask"), ("width", "1"), ("height", "1")])
        .leaf(
            "rect",
            &[("width", "10"), ("height", "10"), ("mask", "url(#notamask)")],
        );
    let doc = tree.build();

    let mut surface = render(&doc, 10, 10, false).unwrap();

    assert_eq!(pixel(&mut surface, 5, 5).a, 255);
}

#[test]
fn compositing_operator_applies_to_the_whole_layer() {
    let mut tree = TreeBuilder::new("10", "10");
    tree.leaf("rect", &[("width", "10"), ("height", "10"), ("fill", "red")])
        .open("g", &[("comp-op", "dst-out")])
        .leaf("rect", &[("width", "5"), ("height", "10"), ("fill", "blue")])
        .close();
    let doc = tree.build();

    let mut surface = render(&doc, 10, 10, false).unwrap();

    // The layer punches a hole wherever it has content.
    assert_eq!(pixel(&mut surface, 2, 5).a, 0);
    assert_eq!(pixel(&mut surface, 7, 5).a, 255);
}
