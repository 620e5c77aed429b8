use fleet_admin::app::AppServices;
use fleet_admin::config::{default_webview_data_dir, Settings};
use fleet_admin::ui::app::App;
use tracing::{error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,fleet_admin=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() {
    init_tracing();

    let settings = Settings::load().unwrap_or_else(|err| {
        warn!(error = %format!("{err:#}"), "falling back to default settings");
        Settings::default()
    });
    let services = match AppServices::from_settings(settings) {
        Ok(services) => services,
        Err(err) => {
            error!(error = %format!("{err:#}"), "failed to start fleet backend");
            std::process::exit(1);
        }
    };
    let webview_data_dir = match default_webview_data_dir() {
        Ok(dir) => dir,
        Err(err) => {
            error!(error = %format!("{err:#}"), "failed to prepare WebView2 data directory");
            std::process::exit(1);
        }
    };

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Fleet Admin"))
                .with_data_directory(webview_data_dir),
        )
        .with_context(services)
        .launch(App);
}
