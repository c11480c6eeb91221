//! Key binding configuration for ie
//!
//! Every action takes a list of keys, written as `j`, `Down`, `<c-n>` or `ctrl+n`.
//! The `prefix_*` lists are the second key of a two-key sequence started by `prefix`.

use serde::Deserialize;

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Keys {
    go_up: Vec<String>,
    go_down: Vec<String>,
    go_to_top: Vec<String>,
    go_to_bottom: Vec<String>,
    open: Vec<String>,
    delete: Vec<String>,
    rename: Vec<String>,
    mark: Vec<String>,
    unmark: Vec<String>,
    toggle_marker: Vec<String>,
    search: Vec<String>,
    search_next: Vec<String>,
    search_prev: Vec<String>,
    quit: Vec<String>,

    prefix: Vec<String>,
    prefix_parent: Vec<String>,
    prefix_new_buffer: Vec<String>,
    prefix_choose_buffer: Vec<String>,
    prefix_rename: Vec<String>,
}

macro_rules! accessor {
    ($($name:ident),+ $(,)?) => {
        impl Keys {
            $(
                #[inline]
                pub fn $name(&self) -> &[String] {
                    &self.$name
                }
            )+
        }
    };
}

accessor!(
    go_up,
    go_down,
    go_to_top,
    go_to_bottom,
    open,
    delete,
    rename,
    mark,
    unmark,
    toggle_marker,
    search,
    search_next,
    search_prev,
    quit,
    prefix,
    prefix_parent,
    prefix_new_buffer,
    prefix_choose_buffer,
    prefix_rename,
);

impl Default for Keys {
    fn default() -> Self {
        Keys {
            go_up: vec!["k".into(), "Up".into(), "<c-p>".into()],
            go_down: vec!["j".into(), "Down".into(), "<c-n>".into()],
            go_to_top: vec!["g".into()],
            go_to_bottom: vec!["G".into()],
            open: vec!["Enter".into()],
            delete: vec!["d".into()],
            rename: vec!["r".into()],
            mark: vec!["m".into()],
            unmark: vec!["u".into()],
            toggle_marker: vec!["Space".into()],
            search: vec!["/".into()],
            search_next: vec!["n".into()],
            search_prev: vec!["N".into()],
            quit: vec!["q".into()],

            prefix: vec!["<c-x>".into()],
            prefix_parent: vec!["Enter".into()],
            prefix_new_buffer: vec!["c".into()],
            prefix_choose_buffer: vec!["b".into()],
            prefix_rename: vec!["<c-q>".into()],
        }
    }
}
