//! Devices command handler

use crate::infrastructure::capture::{list_audio_inputs, list_video_devices};

use super::presenter::Presenter;

/// Print the cameras and microphones that can be recorded from
pub async fn handle_devices_command(presenter: &Presenter) {
    let (cameras, microphones) = tokio::task::spawn_blocking(|| {
        (list_video_devices(), list_audio_inputs())
    })
    .await
    .unwrap_or_default();

    presenter.output("Cameras:");
    if cameras.is_empty() {
        presenter.output("  (none found)");
    }
    for (path, label) in &cameras {
        presenter.key_value(&format!("  {}", path.display()), label);
    }

    presenter.output("Microphones:");
    if microphones.is_empty() {
        presenter.output("  (none found)");
    }
    for name in &microphones {
        presenter.output(&format!("  {}", name));
    }
}
