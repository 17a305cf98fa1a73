//! Input listener overrides (`&mmv_input_listener { ... };`).

use super::{comment_lines, indent};
use crate::firmware::behaviors::behavior_ref;
use crate::firmware::layers::LayerSymbols;
use crate::models::{InputListener, InputProcessor, LayerRef};

fn render_processors(processors: &[InputProcessor]) -> String {
    processors
        .iter()
        .map(|processor| {
            let mut cell = behavior_ref(processor.code.trim());
            for param in &processor.params {
                cell.push_str(&format!(" {param}"));
            }
            format!("<{cell}>")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Layer entries render as given: indices as numbers, declared names as their
/// define, anything else verbatim.
fn render_layers(refs: &[LayerRef], layers: &LayerSymbols) -> String {
    refs.iter()
        .map(|entry| match entry {
            LayerRef::Index(idx) => idx.to_string(),
            LayerRef::Name(name) => layers.define_for(name).unwrap_or_else(|| name.clone()),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders one root-level override block per listener.
pub fn generate_input_listeners_node(listeners: &[InputListener], layers: &LayerSymbols) -> String {
    let mut out = String::new();

    for (idx, listener) in listeners.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{} {{\n", behavior_ref(listener.code.trim())));
        if !listener.input_processors.is_empty() {
            out.push_str(&format!(
                "{}input-processors = {};\n",
                indent(1),
                render_processors(&listener.input_processors)
            ));
        }

        for node in &listener.nodes {
            out.push('\n');
            out.push_str(&comment_lines(node.description.as_deref(), 1));
            out.push_str(&format!("{}{} {{\n", indent(1), node.code.trim()));
            if !node.layers.is_empty() {
                out.push_str(&format!(
                    "{}layers = <{}>;\n",
                    indent(2),
                    render_layers(&node.layers, layers)
                ));
            }
            if !node.input_processors.is_empty() {
                out.push_str(&format!(
                    "{}input-processors = {};\n",
                    indent(2),
                    render_processors(&node.input_processors)
                ));
            }
            out.push_str(&format!("{}}};\n", indent(1)));
        }

        out.push_str("};\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::report::CompileReport;
    use crate::models::InputListenerNode;

    fn processor(code: &str, params: &[i64]) -> InputProcessor {
        InputProcessor {
            code: code.to_string(),
            params: params.to_vec(),
        }
    }

    #[test]
    fn test_listener_override() {
        let mut report = CompileReport::new();
        let layers = LayerSymbols::build(&["Base".to_string(), "Scroll".to_string()], &mut report);
        let listener = InputListener {
            code: "mmv_input_listener".to_string(),
            input_processors: vec![processor("&zip_xy_scaler", &[2, 1])],
            nodes: vec![InputListenerNode {
                code: "scroller".to_string(),
                description: Some("Move to scroll".to_string()),
                layers: vec![LayerRef::Name("Scroll".into()), LayerRef::Index(3)],
                input_processors: vec![
                    processor("zip_xy_to_scroll_mapper", &[]),
                    processor("&zip_scroll_scaler", &[1, 8]),
                ],
            }],
        };

        let text = generate_input_listeners_node(&[listener], &layers);

        let expected = "\
&mmv_input_listener {
    input-processors = <&zip_xy_scaler 2 1>;

    // Move to scroll
    scroller {
        layers = <LAYER_Scroll 3>;
        input-processors = <&zip_xy_to_scroll_mapper>, <&zip_scroll_scaler 1 8>;
    };
};
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_bare_listener() {
        let layers = LayerSymbols::default();
        let listener = InputListener {
            code: "&trackball_listener".to_string(),
            input_processors: Vec::new(),
            nodes: Vec::new(),
        };
        assert_eq!(
            generate_input_listeners_node(&[listener], &layers),
            "&trackball_listener {\n};\n"
        );
        assert_eq!(generate_input_listeners_node(&[], &layers), "");
    }
}
