// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text note content per category. Values are printed in millimetres.

use annograph_graph::Node;
use annograph_model::Category;

use crate::config::PlacementConfig;
use crate::error::PlacementError;

/// Text for `node`. Generic models never get text.
pub fn text_content(node: &Node, config: &PlacementConfig) -> Result<String, PlacementError> {
    match node.category {
        Category::Room => Ok(room_text(node, config)),
        Category::Level => Ok(level_text(node, config)),
        Category::Wall => Ok(wall_text(node, config)),
        Category::Floor => Ok(floor_text(node, config)),
        Category::GenericModel => Err(PlacementError::TextSuppressed),
        Category::StructuralFraming | Category::StructuralFoundation => Ok(format!(
            "{} - {} {}",
            node.category, node.type_name, node.family
        )),
    }
}

fn room_text(node: &Node, config: &PlacementConfig) -> String {
    let mut lines = vec![
        format!("{} {}", node.room_name, node.room_number)
            .trim()
            .to_string(),
        format!("A: {} mm²", config.to_mm2(node.area)),
    ];
    if node.height > 0.0 {
        lines.push(format!("H: {} mm", config.to_mm(node.height)));
    }
    lines.join("\n")
}

fn level_text(node: &Node, config: &PlacementConfig) -> String {
    format!("{} {:+}", node.type_name, config.to_mm(node.level_elevation))
}

fn wall_text(node: &Node, config: &PlacementConfig) -> String {
    format!(
        "{}\nL: {} H: {} t: {}",
        node.type_name,
        config.to_mm(node.length),
        config.to_mm(node.height),
        config.to_mm(node.thickness)
    )
}

fn floor_text(node: &Node, config: &PlacementConfig) -> String {
    format!(
        "{}\nt: {} A: {} mm²",
        node.type_name,
        config.to_mm(node.thickness),
        config.to_mm2(node.area)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use annograph_model::ElementId;

    fn node(category: Category) -> Node {
        let mut n = Node::bare(ElementId(1), category);
        n.family = "Family".into();
        n.type_name = "Type A".into();
        n
    }

    #[test]
    fn room_lines() {
        let config = PlacementConfig::default();
        let mut room = node(Category::Room);
        room.room_name = "Office".into();
        room.room_number = "101".into();
        room.area = 10.0;
        assert_eq!(
            text_content(&room, &config).unwrap(),
            "Office 101\nA: 929030 mm²"
        );

        room.height = 9.0;
        assert!(text_content(&room, &config).unwrap().ends_with("\nH: 2743 mm"));
    }

    #[test]
    fn level_is_signed() {
        let config = PlacementConfig::default();
        let mut level = node(Category::Level);
        level.type_name = "Level 2".into();
        level.level_elevation = 10.0;
        assert_eq!(text_content(&level, &config).unwrap(), "Level 2 +3048");
        level.level_elevation = -1.0;
        assert_eq!(text_content(&level, &config).unwrap(), "Level 2 -305");
    }

    #[test]
    fn wall_and_floor() {
        let config = PlacementConfig::default();
        let mut wall = node(Category::Wall);
        wall.length = 20.0;
        wall.height = 10.0;
        wall.thickness = 0.5;
        assert_eq!(
            text_content(&wall, &config).unwrap(),
            "Type A\nL: 6096 H: 3048 t: 152"
        );

        let mut floor = node(Category::Floor);
        floor.thickness = 1.0;
        floor.area = 2.0;
        assert_eq!(
            text_content(&floor, &config).unwrap(),
            "Type A\nt: 305 A: 185806 mm²"
        );
    }

    #[test]
    fn generic_model_is_suppressed() {
        let config = PlacementConfig::default();
        let mut generic = node(Category::GenericModel);
        generic.length = 3.0;
        generic.area = 4.0;
        assert_eq!(
            text_content(&generic, &config),
            Err(PlacementError::TextSuppressed)
        );
    }

    #[test]
    fn fallback_text() {
        let config = PlacementConfig::default();
        assert_eq!(
            text_content(&node(Category::StructuralFraming), &config).unwrap(),
            "Structural Framing - Type A Family"
        );
    }
}
