use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{EdgeInfo, ForceGraphState, NODE_RADIUS};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#f8f9fa");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let mut positions = HashMap::new();
	state.graph.visit_nodes(|node| {
		positions.insert(node.index(), (node.x() as f64, node.y() as f64));
	});
	for edge in &state.edges {
		draw_edge(state, ctx, edge, &positions);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edge(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	edge: &EdgeInfo,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
) {
	let (Some(&(x1, y1)), Some(&(x2, y2))) = (positions.get(&edge.source), positions.get(&edge.target))
	else {
		return;
	};
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}

	let k = state.transform.k;
	let (line_width, dash, gap, arrow_size) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let t = ease_out_cubic(state.hover.highlight_t);
	let lit = state.is_highlighted(edge.source) && state.is_highlighted(edge.target);

	// Lit edges brighten towards 0.9 while the rest dim towards 0.15.
	let (alpha, width) = if lit {
		(0.6 + 0.3 * t, line_width * (1.0 + 0.3 * t))
	} else {
		(0.6 - 0.45 * t, line_width * (1.0 - 0.3 * t))
	};

	ctx.set_stroke_style_str(&format!("rgba(40, 40, 40, {alpha})"));
	ctx.set_line_width(width);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(dash),
		&JsValue::from_f64(gap),
	));
	ctx.set_line_dash_offset(-(state.flow_time * 30.0) % (dash + gap));

	let (ux, uy) = (dx / dist, dy / dist);
	ctx.begin_path();
	ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
	ctx.line_to(
		x2 - ux * (NODE_RADIUS + arrow_size),
		y2 - uy * (NODE_RADIUS + arrow_size),
	);
	ctx.stroke();

	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.set_fill_style_str(&format!("rgba(40, 40, 40, {})", (alpha + 0.2).min(1.0)));
	let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
	let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
	let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();

	if let Some(label) = &edge.label {
		ctx.set_fill_style_str(&format!("rgba(60, 60, 60, {alpha})"));
		ctx.set_font(&format!("{}px sans-serif", 9.0 / k.max(0.5)));
		ctx.set_text_align("center");
		let _ = ctx.fill_text(label, (x1 + x2) / 2.0, (y1 + y2) / 2.0 - 3.0 / k);
		ctx.set_text_align("start");
	}
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);
	let font = format!("{}px sans-serif", 11.0 / k.max(0.5));

	// Dimmed nodes first so highlighted ones draw on top.
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let (alpha, radius) = (1.0 - 0.7 * t, NODE_RADIUS * (1.0 - 0.15 * t));

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.data.user_data.color);
		ctx.fill();
		if state.selected == Some(idx) {
			stroke_ring(ctx, x, y, radius + 3.0 / k, "#212529", 2.0 / k);
		}
		ctx.set_global_alpha(1.0);

		if let Some(label) = &node.data.user_data.label {
			ctx.set_fill_style_str(&format!("rgba(33, 37, 41, {})", alpha * 0.9));
			ctx.set_font(&font);
			let _ = ctx.fill_text(label, x + radius + 3.0, y + 3.0);
		}
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let hovered = state.is_hovered(idx);
		let (radius, glow_radius) = if hovered {
			(NODE_RADIUS * (1.0 + 0.35 * t), NODE_RADIUS * (1.8 + 1.2 * t))
		} else {
			(NODE_RADIUS * (1.0 + 0.2 * t), NODE_RADIUS * (1.4 + 0.6 * t))
		};

		if t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
				let alpha = if hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(13, 110, 253, {alpha})"));
				let _ = gradient.add_color_stop(1.0, "rgba(13, 110, 253, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.data.user_data.color);
		ctx.fill();

		if hovered && t > 0.01 {
			stroke_ring(ctx, x, y, radius + 2.0 / k, &format!("rgba(13, 110, 253, {})", 0.7 * t), 1.5 / k);
		} else if state.selected == Some(idx) {
			stroke_ring(ctx, x, y, radius + 3.0 / k, "#212529", 2.0 / k);
		}

		if let Some(label) = &node.data.user_data.label {
			ctx.set_fill_style_str("#212529");
			ctx.set_font(&font);
			let _ = ctx.fill_text(label, x + radius + 3.0, y + 3.0);
		}
	});
}

fn stroke_ring(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64, style: &str, width: f64) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(style);
	ctx.set_line_width(width);
	ctx.stroke();
}
