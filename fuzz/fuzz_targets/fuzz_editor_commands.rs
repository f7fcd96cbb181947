#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use panelwall_core::{
    Event, GridSpan, KeyCode, KeyEvent, Modifiers, PointerEvent, PointerEventKind,
};
use panelwall_layout::{BlockId, LayoutConfig, Seam, SeamAxis};
use panelwall_runtime::{DragPolicy, DragState, EditorCommand, OverlapPolicy, WallEditor};

#[derive(Debug, Arbitrary)]
enum Op {
    SetWall { width: Option<u16>, height: Option<u16> },
    SetJointBounds { min: u8, max: u8 },
    ClearBlocks,
    StartDrag { w: u8, h: u8 },
    CancelDrag,
    ToggleSelect { pick: u16, multi: bool },
    ClearSelection,
    CombineSelected,
    HoverSeam { vertical: bool, index: u8 },
    ToggleSeam { vertical: bool, index: u8 },
    ToggleSeamJoint { vertical: bool, index: u8 },
    PointerMove { x: i16, y: i16 },
    Press { x: i16, y: i16, shift: bool },
    Release,
    PointerCancel,
    Escape,
    Focus(bool),
}

#[derive(Debug, Arbitrary)]
struct Session {
    policy: u8,
    ops: Vec<Op>,
}

fn seam(vertical: bool, index: u8) -> Seam {
    let axis = if vertical {
        SeamAxis::Vertical
    } else {
        SeamAxis::Horizontal
    };
    Seam::new(axis, u16::from(index % 24))
}

fuzz_target!(|session: Session| {
    let overlap_policy = match session.policy % 3 {
        0 => OverlapPolicy::Replace,
        1 => OverlapPolicy::AvoidLocked,
        _ => OverlapPolicy::Reject,
    };
    let policy = DragPolicy {
        overlap_policy,
        cancel_on_focus_loss: session.policy & 0x80 == 0,
    };
    let Ok(mut editor) = WallEditor::new(LayoutConfig::default(), policy) else {
        return;
    };

    for op in session.ops.into_iter().take(256) {
        let revision = editor.store().revision();
        let idle_before = editor.drag_state() == DragState::Idle;
        let effect = match op {
            Op::SetWall { width, height } => Some(editor.apply(EditorCommand::SetWall {
                width: width.map(f64::from),
                height: height.map(f64::from),
            })),
            Op::SetJointBounds { min, max } => Some(editor.apply(EditorCommand::SetJointBounds {
                min: f64::from(min) / 16.0,
                max: f64::from(max) / 16.0,
            })),
            Op::ClearBlocks => Some(editor.apply(EditorCommand::ClearBlocks)),
            Op::StartDrag { w, h } => Some(editor.apply(EditorCommand::StartDrag {
                span: GridSpan::new(u16::from(w % 7), u16::from(h % 7)),
            })),
            Op::CancelDrag => Some(editor.apply(EditorCommand::CancelDrag)),
            Op::ToggleSelect { pick, multi } => {
                let blocks = editor.store().blocks();
                let id = if blocks.is_empty() {
                    BlockId::MIN
                } else {
                    blocks[usize::from(pick) % blocks.len()].id
                };
                Some(editor.apply(EditorCommand::ToggleSelect { id, multi }))
            }
            Op::ClearSelection => Some(editor.apply(EditorCommand::ClearSelection)),
            Op::CombineSelected => Some(editor.apply(EditorCommand::CombineSelected)),
            Op::HoverSeam { vertical, index } => Some(editor.apply(EditorCommand::HoverSeam {
                seam: Some(seam(vertical, index)),
            })),
            Op::ToggleSeam { vertical, index } => Some(editor.apply(EditorCommand::ToggleSeam {
                seam: seam(vertical, index),
            })),
            Op::ToggleSeamJoint { vertical, index } => {
                Some(editor.apply(EditorCommand::ToggleSeamJoint {
                    seam: seam(vertical, index),
                }))
            }
            Op::PointerMove { x, y } => editor.handle_event(&Event::Pointer(PointerEvent::moved(
                f64::from(x) / 4.0,
                f64::from(y) / 4.0,
            ))),
            Op::Press { x, y, shift } => {
                let mut press = PointerEvent::pressed(f64::from(x) / 4.0, f64::from(y) / 4.0);
                if shift {
                    press = press.with_modifiers(Modifiers::SHIFT);
                }
                editor.handle_event(&Event::Pointer(press))
            }
            Op::Release => {
                editor.handle_event(&Event::Pointer(PointerEvent::released(0.0, 0.0)))
            }
            Op::PointerCancel => editor.handle_event(&Event::Pointer(PointerEvent::new(
                PointerEventKind::Cancel,
                0.0,
                0.0,
            ))),
            Op::Escape => editor.handle_event(&Event::Key(KeyEvent::new(KeyCode::Escape))),
            Op::Focus(gained) => editor.handle_event(&Event::Focus(gained)),
        };

        // Store invariants hold after every step.
        assert!(editor.store().validate().is_ok(), "store invariant broken");
        let geometry = editor.geometry();
        assert_eq!(editor.store().cols(), geometry.cols);
        assert_eq!(editor.store().rows(), geometry.rows);

        // Selection only names live blocks.
        for id in editor.selection().as_sorted_vec() {
            assert!(editor.store().contains(id), "selection names a removed block");
        }

        // Listeners exist exactly while dragging.
        let idle = editor.drag_state() == DragState::Idle;
        assert_eq!(idle, editor.listeners().total() == 0);

        // Idle input only picks seams and blocks; it never mutates.
        if idle_before && effect.is_none() {
            assert_eq!(editor.store().revision(), revision);
        }
        if let Some(effect) = effect
            && !effect.mutated_store()
        {
            assert_eq!(editor.store().revision(), revision, "{effect:?}");
        }
    }
});
