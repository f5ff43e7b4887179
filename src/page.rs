//! Page-level wiring
//!
//! [`HostPage`] is the context that owns the form fields: it applies a query
//! string coordinate on load and listens for selections posted by a picker.
//! [`PickerWindow`] is a picker surface, either embedded in the host document
//! (writing the fields directly) or living in its own context and posting
//! selections back over the channel.

use crate::{
    channel::{
        listener::MessageListener,
        transport::{ChannelSender, MessageChannel},
    },
    core::{config::PickerOptions, geo::{FormattedCoordinate, LatLng}},
    dom::DomHost,
    input::events::InputEvent,
    picker::{
        controller::{PickerController, SelectionTarget},
        map::MapWidgetFactory,
    },
    runtime::EventLoop,
    sync::{
        bootstrap::UrlBootstrap,
        fields::{ApplyOutcome, FieldBinding, FieldSynchronizer},
        gate::{InitGate, WidgetInitState},
    },
    ui::modal::ModalController,
    Result,
};
use std::{cell::RefCell, rc::Rc};

/// The context holding the coordinate fields
pub struct HostPage {
    options: PickerOptions,
    host: Rc<RefCell<dyn DomHost>>,
    event_loop: Rc<EventLoop>,
    channel: MessageChannel,
    listener: Rc<MessageListener>,
    bootstrap_outcome: Option<ApplyOutcome>,
}

impl HostPage {
    /// Loads the page at `location`.
    ///
    /// Applies any coordinate in the query string, then registers the message
    /// listener. Returns the sender a picker context posts selections with.
    pub fn load(
        options: PickerOptions,
        host: Rc<RefCell<dyn DomHost>>,
        event_loop: Rc<EventLoop>,
        location: &str,
    ) -> Result<(Self, ChannelSender)> {
        options.validate()?;

        let binding = FieldBinding::from(&options.fields);
        let synchronizer = FieldSynchronizer::new(options.zero_policy);

        let bootstrap = UrlBootstrap::new(options.query_keys.clone(), binding.clone(), synchronizer);
        let bootstrap_outcome = bootstrap.run(&mut *host.borrow_mut(), location);

        let (sender, channel) = MessageChannel::channel(options.origin.clone());
        let listener = Rc::new(
            MessageListener::new(host.clone(), binding, synchronizer)
                .with_focus_on_apply(options.focus_on_apply),
        );
        listener.register(&channel);

        log::info!("host page loaded from {:?}", location);
        Ok((
            Self {
                options,
                host,
                event_loop,
                channel,
                listener,
                bootstrap_outcome,
            },
            sender,
        ))
    }

    /// Dispatches queued messages to the listener
    pub fn deliver_messages(&self) -> usize {
        self.channel.pump()
    }

    /// Embeds a same-context picker in this page's document
    pub fn embed_picker(
        &self,
        options: PickerOptions,
        factory: Rc<dyn MapWidgetFactory>,
    ) -> Result<PickerWindow> {
        PickerWindow::same_context(options, self.host.clone(), self.event_loop.clone(), factory)
    }

    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    pub fn host(&self) -> &Rc<RefCell<dyn DomHost>> {
        &self.host
    }

    pub fn event_loop(&self) -> &Rc<EventLoop> {
        &self.event_loop
    }

    pub fn channel(&self) -> &MessageChannel {
        &self.channel
    }

    pub fn listener(&self) -> &Rc<MessageListener> {
        &self.listener
    }

    /// What the query string bootstrap did on load, if it found a coordinate
    pub fn bootstrap_outcome(&self) -> Option<ApplyOutcome> {
        self.bootstrap_outcome
    }
}

/// A picker surface: overlay, init gate and controller wired together
pub struct PickerWindow {
    picker: Rc<RefCell<PickerController>>,
    modal: Rc<ModalController>,
    factory: Rc<dyn MapWidgetFactory>,
}

impl PickerWindow {
    /// Picker sharing a document with the fields it fills
    pub fn same_context(
        options: PickerOptions,
        host: Rc<RefCell<dyn DomHost>>,
        event_loop: Rc<EventLoop>,
        factory: Rc<dyn MapWidgetFactory>,
    ) -> Result<Self> {
        let target = SelectionTarget::SameContext {
            host: host.clone(),
            binding: FieldBinding::from(&options.fields),
            synchronizer: FieldSynchronizer::new(options.zero_policy),
        };
        Self::build(options, host, event_loop, factory, target)
    }

    /// Picker in its own context, posting selections through `sender`
    pub fn cross_context(
        options: PickerOptions,
        host: Rc<RefCell<dyn DomHost>>,
        event_loop: Rc<EventLoop>,
        factory: Rc<dyn MapWidgetFactory>,
        sender: ChannelSender,
    ) -> Result<Self> {
        Self::build(
            options,
            host,
            event_loop,
            factory,
            SelectionTarget::CrossContext { sender },
        )
    }

    fn build(
        options: PickerOptions,
        host: Rc<RefCell<dyn DomHost>>,
        event_loop: Rc<EventLoop>,
        factory: Rc<dyn MapWidgetFactory>,
        target: SelectionTarget,
    ) -> Result<Self> {
        options.validate()?;

        let gate = InitGate::new(
            Rc::new(WidgetInitState::new()),
            event_loop,
            options.settle_delay(),
        );
        let modal = Rc::new(ModalController::new(host, options.overlay_id.clone(), gate));
        let picker = PickerController::new(
            options.container_id,
            options.initial_view,
            options.tiles,
            modal.clone(),
            target,
        );

        Ok(Self {
            picker: Rc::new(RefCell::new(picker)),
            modal,
            factory,
        })
    }

    /// Shows the surface. The first call schedules the map build.
    pub fn open(&self) -> bool {
        PickerController::open(&self.picker, self.factory.clone())
    }

    /// Shows the surface targeting another pair of fields
    pub fn open_for(&self, binding: FieldBinding) -> Result<bool> {
        self.picker.borrow_mut().set_binding(binding)?;
        Ok(self.open())
    }

    pub fn close(&self) {
        self.modal.close();
    }

    pub fn click(&self, lat_lng: LatLng) -> Result<FormattedCoordinate> {
        self.picker.borrow_mut().handle_click(lat_lng)
    }

    pub fn input(&self, input: &InputEvent) -> Result<Option<FormattedCoordinate>> {
        self.picker.borrow_mut().handle_input(input)
    }

    pub fn picker(&self) -> &Rc<RefCell<PickerController>> {
        &self.picker
    }

    pub fn modal(&self) -> &Rc<ModalController> {
        &self.modal
    }
}
