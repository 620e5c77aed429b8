/// Logical width of the main window, in CSS pixels.
pub fn window_width() -> f64 {
    let context = dioxus::desktop::window();
    let scale = context.window.scale_factor();
    context.window.inner_size().to_logical::<f64>(scale).width
}
