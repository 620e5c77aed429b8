use dioxus::desktop::tao::event::{Event, WindowEvent};
use dioxus::desktop::use_wry_event_handler;
use dioxus::prelude::*;

use crate::platform::desktop::viewport::window_width;
use crate::ui::components::pages::{PartEditPage, PartsPage, ShipEditPage, ShipsPage, UsersPage};
use crate::ui::components::BUTTON_STYLE;
use crate::ui::state::app_state::{AppState, Page};

const NAV_ITEMS: [(Page, &str); 3] = [
    (Page::Users, "Users"),
    (Page::Ships, "Ships"),
    (Page::Parts, "Parts"),
];

fn observe_viewport(app: AppState) {
    let mut viewport_width = app.viewport_width;
    let mut sidebar = app.sidebar;
    let width = window_width();
    *viewport_width.write() = width;
    let next = sidebar.peek().observe_width(width);
    if next != *sidebar.peek() {
        *sidebar.write() = next;
    }
}

fn nav_style(active: bool) -> &'static str {
    if active {
        "display: block; width: 100%; text-align: left; padding: 8px 12px; border: none; border-radius: 6px; background: #1e40af; color: #fff; cursor: pointer;"
    } else {
        "display: block; width: 100%; text-align: left; padding: 8px 12px; border: none; border-radius: 6px; background: transparent; color: #e5e7eb; cursor: pointer;"
    }
}

#[component]
pub fn App() -> Element {
    let app = AppState::new();
    use_context_provider(|| app);
    let mut page = app.page;
    let mut sidebar = app.sidebar;
    let status = app.status;

    use_effect(move || observe_viewport(app));
    use_wry_event_handler(move |event, _| {
        if let Event::WindowEvent {
            event: WindowEvent::Resized(_),
            ..
        } = event
        {
            observe_viewport(app);
        }
    });

    let current = page();
    let title = current.title();
    let sidebar_open = sidebar().is_open();
    let section = current.parent();
    let content = match current.clone() {
        Page::Users => rsx! { UsersPage {} },
        Page::Ships => rsx! { ShipsPage {} },
        Page::Parts => rsx! { PartsPage {} },
        Page::ShipEdit(id) => rsx! { ShipEditPage { key: "{id}", id: id.clone() } },
        Page::PartEdit(id) => rsx! { PartEditPage { key: "{id}", id: id.clone() } },
    };

    rsx! {
        div { style: "display: flex; height: 100vh; font-family: system-ui, sans-serif; color: #111827;",
            if sidebar_open {
                nav { style: "width: 220px; background: #111827; padding: 16px; display: flex; flex-direction: column; gap: 6px;",
                    h2 { style: "color: #fff; margin: 0 0 12px 0; font-size: 18px;", "Fleet Admin" }
                    for (target, label) in NAV_ITEMS {
                        button {
                            key: "{label}",
                            style: nav_style(section == target),
                            onclick: move |_| *page.write() = target.clone(),
                            "{label}"
                        }
                    }
                }
            }
            div { style: "flex: 1; display: flex; flex-direction: column; min-width: 0;",
                header { style: "display: flex; align-items: center; gap: 12px; padding: 10px 16px; border-bottom: 1px solid #e5e7eb;",
                    button {
                        style: BUTTON_STYLE,
                        title: "Toggle sidebar",
                        onclick: move |_| {
                            let next = sidebar().toggled();
                            *sidebar.write() = next;
                        },
                        "☰"
                    }
                    strong { "{title}" }
                }
                main { style: "flex: 1; overflow: auto; padding: 16px;", {content} }
                footer { style: "padding: 6px 16px; border-top: 1px solid #e5e7eb; font-size: 12px; color: #6b7280;",
                    "{status}"
                }
            }
        }
    }
}
