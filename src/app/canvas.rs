use eframe::egui::{
    self, Align2, CursorIcon, Event, Frame, Id, Key, Order, Pos2, RichText, Sense, Ui, Vec2, vec2,
};
use relgraph::graph::DefaultEncoder;
use relgraph::interaction::{Mode, PointerButton, PointerEvent};
use relgraph::render::paint;
use relgraph::GraphInstance;

use super::ViewModel;

fn map_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        _ => None,
    }
}

impl ViewModel {
    /// Mounts pending data, or swaps it into the live instance.
    fn apply_pending_data(&mut self, canvas: Vec2) {
        let Some(raw) = self.pending.take() else {
            return;
        };

        match self.instance.as_mut() {
            Some(instance) => instance.replace_data(&raw, &mut self.rng),
            None => {
                self.instance = Some(GraphInstance::mount(
                    &raw,
                    Box::new(DefaultEncoder),
                    self.config.clone(),
                    canvas,
                    &mut self.rng,
                ));
            }
        }
        self.menu_rect = None;
    }

    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        self.apply_pending_data(rect.size());

        let Self {
            instance,
            host,
            details,
            search,
            menu_rect,
            pointer_inside,
            ..
        } = self;
        let Some(instance) = instance.as_mut() else {
            return;
        };
        instance.resize(rect.size());
        instance.set_search(search);

        let origin = rect.min.to_vec2();
        let blocked_by_menu = |pos: Pos2| menu_rect.is_some_and(|menu| menu.contains(pos));
        let events = ui.input(|input| input.events.clone());
        for event in events {
            let gesture_active = !matches!(instance.state().mode(), Mode::Idle | Mode::MenuOpen(_));
            let pointer_event = match event {
                Event::PointerMoved(pos) => {
                    let inside = rect.contains(pos) && !blocked_by_menu(pos);
                    let was_inside = std::mem::replace(pointer_inside, inside);
                    if inside || gesture_active {
                        Some(PointerEvent::Moved { pos: pos - origin })
                    } else if was_inside {
                        Some(PointerEvent::Left)
                    } else {
                        None
                    }
                }
                Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => map_button(button).and_then(|button| {
                    if !pressed {
                        Some(PointerEvent::Released {
                            pos: pos - origin,
                            button,
                        })
                    } else if rect.contains(pos) && !blocked_by_menu(pos) {
                        Some(PointerEvent::Pressed {
                            pos: pos - origin,
                            button,
                        })
                    } else {
                        None
                    }
                }),
                Event::PointerGone => {
                    *pointer_inside = false;
                    Some(PointerEvent::Left)
                }
                _ => None,
            };

            if let Some(pointer_event) = pointer_event {
                instance.handle_pointer(pointer_event, host);
            }
        }

        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            if scroll.abs() > f32::EPSILON {
                let pointer = ui
                    .input(|input| input.pointer.hover_pos())
                    .unwrap_or_else(|| rect.center());
                instance.handle_pointer(
                    PointerEvent::Wheel {
                        pos: pointer - origin,
                        delta: scroll,
                    },
                    host,
                );
            }
        }

        if response.double_clicked()
            && let Some(pos) = response.interact_pointer_pos()
        {
            instance.handle_pointer(PointerEvent::DoubleClicked { pos: pos - origin }, host);
        }

        if ui.input(|input| input.key_pressed(Key::Escape)) && !instance.close_menu() {
            instance.clear_selection(host);
        }

        let frame_delta_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        let output = instance.frame(frame_delta_seconds);
        paint(&output.scene, &painter, rect);
        if output.wants_frame {
            ui.ctx().request_repaint();
        }

        if instance.state().dragged().is_some() {
            ui.output_mut(|output| output.cursor_icon = CursorIcon::Grabbing);
        } else if instance.state().hovered().is_some() {
            ui.output_mut(|output| output.cursor_icon = CursorIcon::PointingHand);
        }

        *menu_rect = None;
        if let Some(menu) = instance.state().menu().cloned() {
            let title = instance
                .graph()
                .node(menu.node)
                .map(|node| node.label().to_owned())
                .unwrap_or_default();
            let mut chosen = None;
            let area = egui::Area::new(Id::new("node_context_menu"))
                .order(Order::Foreground)
                .fixed_pos(rect.min + menu.anchor.to_vec2())
                .show(ui.ctx(), |ui| {
                    Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(RichText::new(title).strong());
                        ui.separator();
                        for action in &menu.actions {
                            if ui.button(action.label()).clicked() {
                                chosen = Some(*action);
                            }
                        }
                    });
                });
            *menu_rect = Some(area.response.rect);
            if let Some(action) = chosen {
                instance.choose_menu_action(action, host);
                ui.ctx().request_repaint();
            }
        }

        if let Some(card) = instance.status_card() {
            egui::Area::new(Id::new("selection_status_card"))
                .order(Order::Foreground)
                .interactable(false)
                .pivot(Align2::CENTER_BOTTOM)
                .fixed_pos(rect.center_bottom() + vec2(0.0, -10.0))
                .show(ui.ctx(), |ui| {
                    Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(RichText::new(&card.title).strong());
                        ui.small(format!("{}  |  {} links", card.group, card.degree));
                        if let Some(value) = &card.value {
                            ui.small(format!("Value {value}"));
                        }
                        if let Some(transactions) = &card.transactions {
                            ui.small(format!("{transactions} transactions"));
                        }
                        if let Some(hint) = &card.hint {
                            ui.small(RichText::new(hint).italics());
                        }
                    });
                });
        }

        instance.sync_overlay(details);
    }
}
