use latlng_picker::prelude::*;
use serde_json::json;
use std::cell::RefCell;

/// Integration tests for the ways a coordinate reaches the form fields:
/// query string on load, a message from a picker frame, or a click in an
/// embedded picker.
#[cfg(test)]
mod integration_tests {
    use super::*;

    struct Admin {
        document: Rc<RefCell<Document>>,
        notifier: RecordingNotifier,
        event_loop: Rc<EventLoop>,
    }

    /// Admin change form with both coordinate inputs and the modal markup
    fn admin_form() -> Admin {
        let notifier = RecordingNotifier::new();
        let mut document = Document::with_fields("id_lat", "id_lng").with_notifier(notifier.clone());
        document.insert("modal-bg", Element::overlay());
        document.insert("map-picker", Element::overlay());
        Admin {
            document: Rc::new(RefCell::new(document)),
            notifier,
            event_loop: Rc::new(EventLoop::new()),
        }
    }

    /// Standalone picker frame with its own document and loop
    fn picker_frame(sender: ChannelSender) -> (PickerWindow, Rc<RefCell<Document>>, Rc<EventLoop>) {
        let options = PickerProfile::StandalonePicker.resolve();
        let mut document = Document::new();
        document.insert("map-modal", Element::overlay());
        document.insert("map-picker", Element::overlay());
        let document = Rc::new(RefCell::new(document));
        let event_loop = Rc::new(EventLoop::new());
        let window = PickerWindow::cross_context(
            options,
            document.clone(),
            event_loop.clone(),
            Rc::new(PickerMapFactory::default()),
            sender,
        )
        .unwrap();
        (window, document, event_loop)
    }

    fn fields(document: &Rc<RefCell<Document>>) -> (String, String) {
        let document = document.borrow();
        (
            document.value("id_lat").unwrap_or_default(),
            document.value("id_lng").unwrap_or_default(),
        )
    }

    #[test]
    fn test_query_string_bootstrap() {
        println!("🧪 [TEST] Testing query string bootstrap");

        let admin = admin_form();
        let (page, _sender) = HostPage::load(
            PickerOptions::default(),
            admin.document.clone(),
            admin.event_loop.clone(),
            "?lat=40.283300&lng=69.616700",
        )
        .unwrap();

        assert!(page.bootstrap_outcome().unwrap().applied);
        assert_eq!(
            fields(&admin.document),
            ("40.283300".to_string(), "69.616700".to_string())
        );
        assert_eq!(admin.notifier.notifications(), vec!["id_lat", "id_lng"]);
        println!("✅ [TEST] Query string bootstrap test passed");
    }

    #[test]
    fn test_partial_query_leaves_fields_alone() {
        let admin = admin_form();
        let (page, _sender) = HostPage::load(
            PickerOptions::default(),
            admin.document.clone(),
            admin.event_loop.clone(),
            "?lat=40.283300&lng=",
        )
        .unwrap();

        assert!(page.bootstrap_outcome().is_none());
        assert_eq!(fields(&admin.document), (String::new(), String::new()));
        assert_eq!(admin.notifier.count(), 0);
    }

    #[test]
    fn test_message_from_other_context() {
        println!("🧪 [TEST] Testing cross-context message");

        let admin = admin_form();
        let (page, sender) = HostPage::load(
            PickerOptions::default(),
            admin.document.clone(),
            admin.event_loop.clone(),
            "",
        )
        .unwrap();

        sender
            .post(json!({ "type": "coords_selected", "lat": "41.0", "lng": "70.0" }))
            .unwrap();
        page.deliver_messages();

        assert_eq!(
            fields(&admin.document),
            ("41.000000".to_string(), "70.000000".to_string())
        );
        assert_eq!(admin.document.borrow().focused(), Some("id_lat"));
        println!("✅ [TEST] Cross-context message test passed");
    }

    #[test]
    fn test_foreign_and_malformed_messages_are_ignored() {
        let admin = admin_form();
        let (page, sender) = HostPage::load(
            PickerOptions::default(),
            admin.document.clone(),
            admin.event_loop.clone(),
            "",
        )
        .unwrap();

        for payload in [
            json!(null),
            json!("coords_selected"),
            json!({ "lat": 1.0, "lng": 2.0 }),
            json!({ "type": "resize", "lat": 1.0, "lng": 2.0 }),
            json!({ "type": "coords_selected", "lat": { "value": 1.0 }, "lng": 2.0 }),
        ] {
            sender.post(payload).unwrap();
        }
        assert_eq!(page.deliver_messages(), 5);

        assert_eq!(fields(&admin.document), (String::new(), String::new()));
        assert_eq!(admin.notifier.count(), 0);
        assert_eq!(page.listener().applied_count(), 0);
        assert_eq!(page.listener().rejected_count(), 1);

        // The listener keeps working after a bad payload
        sender
            .send(&CoordinateSelectionEvent::new(12.0, 34.5))
            .unwrap();
        page.deliver_messages();
        assert_eq!(
            fields(&admin.document),
            ("12.000000".to_string(), "34.500000".to_string())
        );
    }

    #[test]
    fn test_latitude_only_document() {
        let notifier = RecordingNotifier::new();
        let mut document = Document::new().with_notifier(notifier.clone());
        document.insert("id_lat", Element::input(""));
        let document = Rc::new(RefCell::new(document));
        let (page, sender) =
            HostPage::load(PickerOptions::default(), document.clone(), Rc::new(EventLoop::new()), "")
                .unwrap();

        sender.send(&CoordinateSelectionEvent::new("1.5", "2.5")).unwrap();
        page.deliver_messages();

        assert_eq!(document.borrow().value("id_lat").as_deref(), Some("1.500000"));
        assert_eq!(document.borrow().value("id_lng"), None);
        assert_eq!(page.listener().applied_count(), 1);
    }

    #[test]
    fn test_picker_frame_to_host_page() {
        println!("🧪 [TEST] Testing picker frame click end to end");

        let admin = admin_form();
        let (page, sender) = HostPage::load(
            PickerOptions::default(),
            admin.document.clone(),
            admin.event_loop.clone(),
            "",
        )
        .unwrap();
        let (window, frame_document, frame_loop) = picker_frame(sender);

        assert!(window.open());
        assert_eq!(frame_document.borrow().display("map-modal"), Some(Display::Block));
        frame_loop.advance(Duration::from_millis(300));

        window.click(LatLng::new(40.123456789, 69.987654321)).unwrap();
        assert_eq!(frame_document.borrow().display("map-modal"), Some(Display::None));
        assert!(!window.modal().is_visible());

        // Nothing lands until the host pumps its channel
        assert_eq!(fields(&admin.document), (String::new(), String::new()));
        page.deliver_messages();
        assert_eq!(
            fields(&admin.document),
            ("40.123457".to_string(), "69.987654".to_string())
        );
        println!("✅ [TEST] Picker frame end to end test passed");
    }

    #[test]
    fn test_same_and_cross_context_agree() {
        let point = LatLng::new(-33.8688197, 151.2092961);

        let embedded = admin_form();
        let window = PickerWindow::same_context(
            PickerOptions::default(),
            embedded.document.clone(),
            embedded.event_loop.clone(),
            Rc::new(PickerMapFactory::default()),
        )
        .unwrap();
        window.open();
        embedded.event_loop.run_until_idle();
        window.click(point).unwrap();

        let framed = admin_form();
        let (page, sender) = HostPage::load(
            PickerOptions::default(),
            framed.document.clone(),
            framed.event_loop.clone(),
            "",
        )
        .unwrap();
        let (frame, _, frame_loop) = picker_frame(sender);
        frame.open();
        frame_loop.run_until_idle();
        frame.click(point).unwrap();
        page.deliver_messages();

        assert_eq!(fields(&embedded.document), fields(&framed.document));
        assert_eq!(
            fields(&embedded.document),
            ("-33.868820".to_string(), "151.209296".to_string())
        );
    }

    #[test]
    fn test_map_builds_once_across_reopens() {
        let admin = admin_form();
        let window = PickerWindow::same_context(
            PickerOptions::default(),
            admin.document.clone(),
            admin.event_loop.clone(),
            Rc::new(PickerMapFactory::default()),
        )
        .unwrap();

        assert!(window.open());
        window.close();
        assert!(!window.open());
        assert!(!window.open());
        admin.event_loop.run_until_idle();

        assert!(window.modal().gate().is_initialized());
        assert_eq!(window.picker().borrow().state(), PickerState::Idle);
        assert_eq!(admin.event_loop.executed_tasks(), 1);
        assert_eq!(window.modal().open_count(), 3);
    }

    #[test]
    fn test_one_marker_after_many_clicks() {
        let admin = admin_form();
        let window = PickerWindow::same_context(
            PickerOptions::default(),
            admin.document.clone(),
            admin.event_loop.clone(),
            Rc::new(PickerMapFactory::default()),
        )
        .unwrap();
        window.open();
        admin.event_loop.advance(Duration::from_millis(100));

        let last = LatLng::new(41.3111, 69.2797);
        for point in [LatLng::new(40.0, 69.0), LatLng::new(40.5, 69.5), last] {
            window.open();
            window.click(point).unwrap();
        }

        let picker = window.picker().borrow();
        let widget = picker.widget().unwrap();
        assert_eq!(widget.marker_count(), 1);
        assert_eq!(widget.marker_position(picker.active_marker().unwrap()), Some(last));
        assert_eq!(
            fields(&admin.document),
            ("41.311100".to_string(), "69.279700".to_string())
        );
    }

    #[test]
    fn test_zero_policy_from_json_options() {
        let admin = admin_form();
        let options = PickerOptions::from_json_str(r#"{ "zero_policy": "accept_zero" }"#).unwrap();
        let (page, sender) =
            HostPage::load(options, admin.document.clone(), admin.event_loop.clone(), "").unwrap();

        sender.send(&CoordinateSelectionEvent::new(0.0, 69.5)).unwrap();
        page.deliver_messages();
        assert_eq!(
            fields(&admin.document),
            ("0.000000".to_string(), "69.500000".to_string())
        );

        let legacy = admin_form();
        let (page, sender) = HostPage::load(
            PickerOptions::default(),
            legacy.document.clone(),
            legacy.event_loop.clone(),
            "",
        )
        .unwrap();
        sender.send(&CoordinateSelectionEvent::new(0.0, 69.5)).unwrap();
        page.deliver_messages();
        assert_eq!(fields(&legacy.document), (String::new(), String::new()));
    }

    /// Picker frame on another thread, host driven by the real-time loop
    #[tokio::test(start_paused = true)]
    async fn test_realtime_loop_delivers_from_thread() {
        println!("🧪 [TEST] Testing real-time delivery from a picker thread");

        let admin = admin_form();
        let (page, sender) = HostPage::load(
            PickerOptions::default(),
            admin.document.clone(),
            admin.event_loop.clone(),
            "",
        )
        .unwrap();

        std::thread::spawn(move || {
            let (window, _, frame_loop) = picker_frame(sender);
            window.open();
            frame_loop.run_until_idle();
            window
                .input(&InputEvent::click(400.0, 250.0))
                .unwrap()
                .unwrap()
        })
        .join()
        .unwrap();

        admin
            .event_loop
            .run_realtime(|| page.deliver_messages(), Duration::from_millis(50))
            .await;

        assert_eq!(
            fields(&admin.document),
            ("40.283300".to_string(), "69.616700".to_string())
        );
        println!("✅ [TEST] Real-time delivery test passed");
    }
}
