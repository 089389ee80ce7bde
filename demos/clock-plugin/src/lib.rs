//! Clock Plugin - An example plugin for meterbar
//!
//! This plugin demonstrates:
//! - Exporting a plugin with the `export_plugin!` macro
//! - Contributing several display items
//! - Receiving the per-plugin config directory (API version 2)
//! - Reporting a context-dependent width (API version 3)
//!
//! ## Building
//!
//! ```bash
//! cargo build --release
//! ```
//!
//! ## Installing
//!
//! ```bash
//! mkdir -p ~/.local/share/meterbar/plugins
//! cp target/release/libclock_plugin.so ~/.local/share/meterbar/plugins/clock.so
//! meterbar plugin info clock.so
//! ```

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use meterbar_plugin_api::{
    API_VERSION, DisplayItem, DrawContext, ExtendedInfo, InfoKind, MeterPlugin, PluginError,
    export_plugin,
};

/// Time of day (UTC), refreshed on every `data_required`
#[derive(Default)]
struct Clock {
    text: Mutex<String>,
}

impl Clock {
    fn refresh(&self) {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let text = format!(
            "{:02}:{:02}:{:02}",
            (secs / 3600) % 24,
            (secs / 60) % 60,
            secs % 60
        );
        if let Ok(mut guard) = self.text.lock() {
            *guard = text;
        }
    }
}

impl DisplayItem for Clock {
    fn id(&self) -> &str {
        "clock"
    }

    fn width(&self) -> i32 {
        64
    }

    fn width_ex(&self, ctx: &DrawContext) -> i32 {
        // Without a surface we cannot measure text; let the host scale.
        if !ctx.has_surface() {
            return 0;
        }
        (64 * ctx.dpi as i32 + 48) / 96
    }

    fn name(&self) -> &str {
        "Clock"
    }

    fn value_text(&self) -> String {
        self.text.lock().map(|t| t.clone()).unwrap_or_default()
    }

    fn value_sample_text(&self) -> String {
        "88:88:88".to_string()
    }
}

/// Time since the plugin was loaded
struct Uptime {
    started: Instant,
}

impl DisplayItem for Uptime {
    fn id(&self) -> &str {
        "uptime"
    }

    fn width(&self) -> i32 {
        72
    }

    fn name(&self) -> &str {
        "Uptime"
    }

    fn label_text(&self) -> String {
        "Up:".to_string()
    }

    fn value_text(&self) -> String {
        let secs = self.started.elapsed().as_secs();
        format!("{}h {:02}m", secs / 3600, (secs / 60) % 60)
    }

    fn value_sample_text(&self) -> String {
        "999h 59m".to_string()
    }
}

/// Plugin contributing a clock and an uptime counter
pub struct ClockPlugin {
    clock: Arc<Clock>,
    uptime: Arc<Uptime>,
    config_dir: Mutex<Option<PathBuf>>,
}

impl Default for ClockPlugin {
    fn default() -> Self {
        let clock = Arc::new(Clock::default());
        clock.refresh();
        Self {
            clock,
            uptime: Arc::new(Uptime {
                started: Instant::now(),
            }),
            config_dir: Mutex::new(None),
        }
    }
}

impl MeterPlugin for ClockPlugin {
    fn api_version(&self) -> i32 {
        API_VERSION
    }

    fn info(&self, kind: InfoKind) -> Option<String> {
        let value = match kind {
            InfoKind::Name => "Clock",
            InfoKind::Description => "Time of day and uptime",
            InfoKind::Author => "meterbar contributors",
            InfoKind::Copyright => "MIT",
            InfoKind::Version => env!("CARGO_PKG_VERSION"),
            InfoKind::Url => return None,
        };
        Some(value.to_string())
    }

    fn item(&self, index: usize) -> Option<Arc<dyn DisplayItem>> {
        match index {
            0 => Some(self.clock.clone()),
            1 => Some(self.uptime.clone()),
            _ => None,
        }
    }

    fn on_extended_info(&self, kind: ExtendedInfo, value: &str) -> Result<(), PluginError> {
        match kind {
            ExtendedInfo::ConfigDir => {
                let mut dir = self
                    .config_dir
                    .lock()
                    .map_err(|_| PluginError::custom("config dir lock poisoned"))?;
                *dir = Some(PathBuf::from(value));
            }
        }
        Ok(())
    }

    fn data_required(&self) {
        self.clock.refresh();
    }
}

export_plugin!(ClockPlugin);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_end_after_two() {
        let plugin = ClockPlugin::default();
        assert_eq!(plugin.item(0).unwrap().id(), "clock");
        assert_eq!(plugin.item(1).unwrap().id(), "uptime");
        assert!(plugin.item(2).is_none());
    }

    #[test]
    fn test_clock_text_shape() {
        let plugin = ClockPlugin::default();
        let text = plugin.clock.value_text();
        assert_eq!(text.len(), 8);
        assert_eq!(text.matches(':').count(), 2);
    }

    #[test]
    fn test_width_ex_defers_without_surface() {
        let clock = Clock::default();
        assert_eq!(clock.width_ex(&DrawContext::detached(144)), 0);
        assert_eq!(clock.width_ex(&DrawContext::new(1, 144)), 96);
    }

    #[test]
    fn test_config_dir_is_recorded() {
        let plugin = ClockPlugin::default();
        plugin
            .on_extended_info(ExtendedInfo::ConfigDir, "/tmp/clock")
            .unwrap();
        let dir = plugin.config_dir.lock().unwrap().clone();
        assert_eq!(dir, Some(PathBuf::from("/tmp/clock")));
    }
}
