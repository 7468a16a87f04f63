//! Built-in hierarchy scanned when no snapshot is given.

use xray_view::composable::{ComposableState, IntBounds, SemanticsProperty};
use xray_view::{Composable, View, ViewState, WindowManager};

fn sized(id: &str, width: i32, height: i32) -> ViewState {
    ViewState {
        id: Some(id.to_string()),
        width,
        height,
        ..ViewState::default()
    }
}

/// A focused activity window with classic widgets and a hosted composition
/// embedding a classic view, plus an unfocused popup.
pub fn sample_hierarchy() -> WindowManager {
    let decor = View::with_state(
        "com.android.internal.policy.DecorView",
        ViewState {
            width: 1080,
            height: 1920,
            ..ViewState::default()
        },
    );
    let content = View::with_state("android.widget.LinearLayout", sized("content", 1080, 1920));
    decor.add_child(content.clone());

    content.add_child(View::with_state(
        "android.widget.TextView",
        ViewState {
            text: Some("Sample hierarchy".to_string()),
            ..sized("title", 1080, 120)
        },
    ));
    content.add_child(View::with_state(
        "android.widget.CheckBox",
        ViewState {
            text: Some("Remember me".to_string()),
            checked: Some(true),
            ..sized("remember", 540, 96)
        },
    ));
    content.add_child(View::with_state(
        "android.widget.EditText",
        ViewState {
            text: Some("Ada Lovelace".to_string()),
            focused: true,
            ime_target: true,
            ..sized("name", 1080, 144)
        },
    ));

    let host = View::with_state(
        "androidx.compose.ui.platform.ComposeView",
        sized("compose", 1080, 600),
    );
    let column = Composable::with_state(
        "Column",
        ComposableState {
            bounds: IntBounds::new(0, 360, 1080, 960),
            semantics: vec![SemanticsProperty::TestTag("compose-root".to_string())],
            ..ComposableState::default()
        },
    );
    column.add_child(Composable::with_state(
        "Text",
        ComposableState {
            bounds: IntBounds::new(0, 360, 1080, 420),
            semantics: vec![SemanticsProperty::Text(vec![
                "Hello from a composition".to_string(),
            ])],
            ..ComposableState::default()
        },
    ));
    let interop = Composable::with_state(
        "AndroidView",
        ComposableState {
            bounds: IntBounds::new(0, 420, 1080, 620),
            semantics: vec![SemanticsProperty::TestTag("interop".to_string())],
            ..ComposableState::default()
        },
    );
    interop.set_view(Some(View::with_state(
        "android.widget.TextView",
        ViewState {
            text: Some("Classic view".to_string()),
            ..sized("legacy", 1080, 200)
        },
    )));
    column.add_child(interop);
    host.set_composition(Some(column));
    content.add_child(host);

    let popup = View::with_state(
        "android.widget.PopupWindow$PopupDecorView",
        ViewState {
            width: 400,
            height: 300,
            ..ViewState::default()
        },
    );
    popup.add_child(View::with_state(
        "android.widget.Button",
        ViewState {
            text: Some("OK".to_string()),
            enabled: false,
            ..sized("ok", 200, 96)
        },
    ));

    let manager = WindowManager::new();
    manager.add_window("com.example.MainActivity", decor);
    manager.add_window("PopupWindow", popup);
    manager.focus_window("com.example.MainActivity");
    manager
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_window_has_focus() {
        let windows = sample_hierarchy().windows();
        assert_eq!(windows.len(), 2);
        assert!(windows[0].has_focus());
        assert!(!windows[1].has_focus());
    }

    #[test]
    fn composition_embeds_a_classic_view() {
        let windows = sample_hierarchy().windows();
        let content = windows[0].root.child_at(0).unwrap();
        let host = content.child_at(3).unwrap();
        let column = host.composition().unwrap();
        let embedded = column.child_at(1).unwrap().view().unwrap();
        assert_eq!(embedded.simple_class_name(), "TextView");
    }
}
