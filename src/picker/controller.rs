use crate::{
    channel::{message::CoordinateSelectionEvent, transport::ChannelSender},
    core::{
        config::{InitialView, TileSource},
        geo::{FormattedCoordinate, LatLng},
    },
    dom::DomHost,
    input::events::{InputEvent, MapEvent},
    picker::map::{MapWidget, MapWidgetFactory},
    sync::fields::{FieldBinding, FieldSynchronizer},
    ui::modal::ModalController,
    PickerError, Result,
};
use std::{cell::RefCell, rc::Rc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickerState {
    Uninitialized,
    Idle,
    MarkerPlaced(LatLng),
}

/// Where a picked coordinate goes
pub enum SelectionTarget {
    /// Fields share the picker's document; write them directly
    SameContext {
        host: Rc<RefCell<dyn DomHost>>,
        binding: FieldBinding,
        synchronizer: FieldSynchronizer,
    },
    /// Fields live in another context; post a selection message
    CrossContext { sender: ChannelSender },
}

impl std::fmt::Debug for SelectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionTarget::SameContext { binding, .. } => {
                f.debug_struct("SameContext").field("binding", binding).finish()
            }
            SelectionTarget::CrossContext { sender } => f
                .debug_struct("CrossContext")
                .field("origin", &sender.origin())
                .finish(),
        }
    }
}

/// Owns the map widget inside the picker surface and turns clicks into
/// coordinate selections. One click selects and closes the surface.
pub struct PickerController {
    container_id: String,
    initial_view: InitialView,
    tiles: TileSource,
    modal: Rc<ModalController>,
    target: SelectionTarget,
    widget: Option<Box<dyn MapWidget>>,
    marker: Option<String>,
    state: PickerState,
}

impl PickerController {
    pub fn new(
        container_id: impl Into<String>,
        initial_view: InitialView,
        tiles: TileSource,
        modal: Rc<ModalController>,
        target: SelectionTarget,
    ) -> Self {
        Self {
            container_id: container_id.into(),
            initial_view,
            tiles,
            modal,
            target,
            widget: None,
            marker: None,
            state: PickerState::Uninitialized,
        }
    }

    /// Constructs the widget and its background layer
    pub fn build(&mut self, factory: &dyn MapWidgetFactory) -> Result<()> {
        if self.widget.is_some() {
            return Err(PickerError::AlreadyInitialized);
        }

        let mut widget = {
            let host = self
                .modal
                .host()
                .try_borrow()
                .map_err(|e| PickerError::Widget(format!("document busy: {}", e)))?;
            factory.create(&*host, &self.container_id, &self.initial_view)?
        };
        widget.add_tile_layer(&self.tiles)?;

        log::info!("map widget ready in '{}'", self.container_id);
        self.widget = Some(widget);
        self.state = PickerState::Idle;
        Ok(())
    }

    /// Opens the picker surface, building the widget on first open.
    ///
    /// Returns `true` when this call scheduled the build.
    pub fn open(picker: &Rc<RefCell<Self>>, factory: Rc<dyn MapWidgetFactory>) -> bool {
        let modal = Rc::clone(&picker.borrow().modal);
        let target = Rc::clone(picker);
        modal.open(move || {
            if let Err(e) = target.borrow_mut().build(factory.as_ref()) {
                log::error!("map widget construction failed: {}", e);
            }
        })
    }

    /// Feeds raw input to the widget and handles any resulting clicks.
    ///
    /// Input before the widget exists is ignored.
    pub fn handle_input(&mut self, input: &InputEvent) -> Result<Option<FormattedCoordinate>> {
        let events = match self.widget.as_mut() {
            Some(widget) => {
                widget.handle_input(input);
                widget.drain_events()
            }
            None => {
                log::trace!("input before map widget exists, ignoring");
                return Ok(None);
            }
        };

        let mut selected = None;
        for MapEvent::Click { lat_lng, .. } in events {
            selected = Some(self.handle_click(lat_lng)?);
        }
        Ok(selected)
    }

    /// Selects the clicked coordinate.
    ///
    /// Delivers the formatted value, replaces the marker and closes the
    /// surface. Delivery problems are logged; the selection still completes.
    pub fn handle_click(&mut self, lat_lng: LatLng) -> Result<FormattedCoordinate> {
        let widget = self.widget.as_mut().ok_or(PickerError::NotInitialized)?;
        let formatted = lat_lng.format();

        match &self.target {
            SelectionTarget::SameContext {
                host,
                binding,
                synchronizer,
            } => match host.try_borrow_mut() {
                Ok(mut host) => {
                    synchronizer.apply_formatted(&mut *host, binding, &formatted);
                }
                Err(e) => log::error!("cannot write picked coordinate: {}", e),
            },
            SelectionTarget::CrossContext { sender } => {
                if let Err(e) = sender.send(&CoordinateSelectionEvent::from_formatted(&formatted)) {
                    log::error!("failed to post picked coordinate: {}", e);
                }
            }
        }

        if let Some(previous) = self.marker.take() {
            widget.remove_marker(&previous);
        }
        self.marker = Some(widget.add_marker(lat_lng)?);
        self.state = PickerState::MarkerPlaced(lat_lng);

        log::debug!("picked {}", formatted);
        self.modal.close();
        Ok(formatted)
    }

    /// Points a same-context picker at another pair of fields
    pub fn set_binding(&mut self, new_binding: FieldBinding) -> Result<()> {
        match &mut self.target {
            SelectionTarget::SameContext { binding, .. } => {
                *binding = new_binding;
                Ok(())
            }
            SelectionTarget::CrossContext { .. } => Err(PickerError::Config(
                "cross-context picker has no field binding".to_string(),
            )),
        }
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn widget(&self) -> Option<&dyn MapWidget> {
        self.widget.as_deref()
    }

    /// Layer id of the active marker
    pub fn active_marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    pub fn target(&self) -> &SelectionTarget {
        &self.target
    }

    pub fn modal(&self) -> &Rc<ModalController> {
        &self.modal
    }
}
