use anyhow::{anyhow, Context};
use latlng_picker::{
    core::config::PickerProfile,
    dom::{Document, Element, RecordingNotifier},
    input::InputEvent,
    page::{HostPage, PickerWindow},
    picker::PickerMapFactory,
    runtime::EventLoop,
    DomHost, FormattedCoordinate, PickerOptions,
};
use std::{cell::RefCell, rc::Rc, thread, time::Duration};

/// Demo: a host page with coordinate fields and a picker sub-window on another
/// thread. The sub-window clicks its map once; the selection travels back over
/// the message channel and lands in the host's fields.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let location = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://admin.example/places/add/".to_string());
    let click = match std::env::args().nth(2) {
        Some(json) => serde_json::from_str::<(f64, f64)>(&json)
            .context("click must be a JSON pair of container pixels, e.g. [400, 250]")?,
        None => (520.0, 180.0),
    };

    // Host context
    let notifier = RecordingNotifier::new();
    let host_options = PickerProfile::AdminModal.resolve();
    let document = Rc::new(RefCell::new(
        Document::with_fields(&host_options.fields.lat, &host_options.fields.lng)
            .with_notifier(notifier.clone()),
    ));
    let host_loop = Rc::new(EventLoop::new());
    let (page, sender) = HostPage::load(host_options, document.clone(), host_loop.clone(), &location)?;
    if page.bootstrap_outcome().is_some() {
        print_fields("after query bootstrap", &*document.borrow(), page.options());
    }

    // Picker sub-window
    let window = thread::spawn(move || -> latlng_picker::Result<FormattedCoordinate> {
        let mut options = PickerProfile::StandalonePicker.resolve();
        options.origin = "https://picker.example".to_string();

        let mut picker_document = Document::new();
        picker_document.insert(&options.overlay_id, Element::overlay());
        picker_document.insert(&options.container_id, Element::overlay());

        let event_loop = Rc::new(EventLoop::new());
        let window = PickerWindow::cross_context(
            options,
            Rc::new(RefCell::new(picker_document)),
            event_loop.clone(),
            Rc::new(PickerMapFactory::default()),
            sender,
        )?;

        window.open();
        event_loop.run_until_idle();
        window
            .input(&InputEvent::click(click.0, click.1))?
            .ok_or(latlng_picker::PickerError::NotInitialized)
    });

    let ran = host_loop
        .run_realtime(|| page.deliver_messages(), Duration::from_millis(250))
        .await;
    log::debug!("host loop ran {} tasks", ran);

    let picked = window
        .join()
        .map_err(|_| anyhow!("picker window thread panicked"))??;
    // Catch a selection posted after the loop went idle
    page.deliver_messages();

    println!("picked {}", picked);
    print_fields("after selection", &*document.borrow(), page.options());
    println!("change notifications: {:?}", notifier.notifications());
    Ok(())
}

fn print_fields(stage: &str, document: &dyn DomHost, options: &PickerOptions) {
    println!(
        "{}: {} = {:?}, {} = {:?}",
        stage,
        options.fields.lat,
        document.value(&options.fields.lat).unwrap_or_default(),
        options.fields.lng,
        document.value(&options.fields.lng).unwrap_or_default(),
    );
}
