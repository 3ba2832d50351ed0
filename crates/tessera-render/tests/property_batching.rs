//! Property tests for overflow and texture slot handling.

use std::sync::Arc;

use proptest::prelude::*;
use tessera_render::{
    BatchRenderer, BatchRendererConfig, CommandReceiver, DrawCommand, Mat4, QuadParams,
    QuadVertex, RenderCommand, TextureHandle, command_queue,
};
use tessera_test_utils::MockRenderContext;

fn draws(receiver: &CommandReceiver) -> Vec<DrawCommand> {
    receiver
        .drain()
        .into_iter()
        .filter_map(|command| match command {
            RenderCommand::Draw(draw) => Some(draw),
            _ => None,
        })
        .collect()
}

fn setup(config: BatchRendererConfig) -> (BatchRenderer, CommandReceiver) {
    let (queue, receiver) = command_queue();
    let renderer = BatchRenderer::new(Arc::new(MockRenderContext::new()), config, queue)
        .expect("valid config");
    (renderer, receiver)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every submitted quad is drawn exactly once and no draw exceeds the
    /// batch capacity.
    #[test]
    fn prop_overflow_preserves_every_element(
        capacity in 1u32..64,
        count in 0u32..512,
    ) {
        let (mut renderer, receiver) =
            setup(BatchRendererConfig::default().with_max_quads(capacity));

        renderer.begin_session(Mat4::IDENTITY, Mat4::IDENTITY).unwrap();
        for _ in 0..count {
            renderer.submit_quad(&Mat4::IDENTITY, &QuadParams::default()).unwrap();
        }
        renderer.end_session().unwrap();

        let draws = draws(&receiver);
        let total: u32 = draws.iter().map(|d| d.elements).sum();
        prop_assert_eq!(total, count);
        prop_assert_eq!(draws.len() as u32, count.div_ceil(capacity));
        for draw in &draws {
            prop_assert!(draw.elements <= capacity);
            prop_assert_eq!(draw.call.count, draw.elements * 6);
            prop_assert_eq!(draw.vertices.len(), draw.elements as usize * 4 * size_of::<QuadVertex>());
        }
    }

    /// Within every draw, caller textures are unique and each element's slot
    /// index points at its own texture.
    #[test]
    fn prop_slots_are_unique_and_consistent(
        slot_limit in 2u32..8,
        picks in proptest::collection::vec(proptest::option::of(0usize..12), 0..200),
    ) {
        let (mut renderer, receiver) =
            setup(BatchRendererConfig::default().with_max_texture_slots(slot_limit));
        let handles: Vec<TextureHandle> = (0..12)
            .map(|_| renderer.create_texture_rgba8(1, 1, &[255; 4]))
            .collect();

        renderer.begin_session(Mat4::IDENTITY, Mat4::IDENTITY).unwrap();
        for pick in &picks {
            let params = QuadParams {
                texture: pick.map(|i| handles[i]),
                ..QuadParams::default()
            };
            renderer.submit_quad(&Mat4::IDENTITY, &params).unwrap();
        }
        renderer.end_session().unwrap();

        let white = renderer.textures().white_texture().clone();
        let mut elements = picks.iter();
        for draw in draws(&receiver) {
            let bound = &draw.call.textures;
            prop_assert!(bound.len() as u32 <= slot_limit);
            prop_assert_eq!(&bound[0], &white);
            for (i, texture) in bound.iter().enumerate().skip(1) {
                prop_assert!(!bound[i + 1..].contains(texture));
            }

            let vertices: Vec<QuadVertex> = bytemuck::pod_collect_to_vec(&draw.vertices);
            for quad in vertices.chunks(4) {
                let pick = elements.next().copied().flatten();
                let slot = quad[0].tex_index as usize;
                prop_assert!(quad.iter().all(|v| v.tex_index == quad[0].tex_index));
                match pick {
                    None => prop_assert_eq!(slot, 0),
                    Some(i) => {
                        prop_assert!(slot > 0);
                        prop_assert_eq!(&bound[slot], renderer.textures().get(handles[i]).unwrap());
                    }
                }
            }
        }
        prop_assert!(elements.next().is_none());
    }
}
