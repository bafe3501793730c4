// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON snapshots of a scene subtree.
//!
//! Each node becomes an object carrying its identity, ordering keys,
//! transform inputs, display state and lifecycle flag, with a `children`
//! array in stored order.

use std::io::{self, Write};

use serde_json::{Value, json};

use strata_core::node::{NodeId, SceneGraph};

/// Returns a JSON description of the subtree rooted at `root`.
#[must_use]
pub fn tree_json(graph: &SceneGraph, root: NodeId) -> Value {
    let state = graph.transform_state(root);
    let children: Vec<Value> = graph
        .children(root)
        .map(|child| tree_json(graph, child))
        .collect();
    json!({
        "id": format!("{root:?}"),
        "tag": graph.tag(root),
        "name": graph.name(root),
        "local_z": graph.local_z_order(root),
        "global_z": graph.global_z_order(root),
        "arrival": graph.order_of_arrival(root),
        "position": [state.position.x, state.position.y, state.position_z],
        "rotation": {
            "x": state.rotation_x,
            "y": state.rotation_y,
            "skew_x": state.rotation_skew_x,
            "skew_y": state.rotation_skew_y,
        },
        "scale": state.scale,
        "skew": [state.skew_x, state.skew_y],
        "anchor": [state.anchor.x, state.anchor.y],
        "content_size": [state.content_size.width, state.content_size.height],
        "visible": graph.is_visible(root),
        "opacity": graph.opacity(root),
        "running": graph.is_running(root),
        "children": children,
    })
}

/// Writes the JSON description of the subtree rooted at `root`.
pub fn write_tree(graph: &SceneGraph, root: NodeId, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, &tree_json(graph, root))?;
    Ok(())
}
