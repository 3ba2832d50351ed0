//! WGSL sources of the batch programs.
//!
//! Every program shares one bind group: the camera uniform at binding 0, a
//! sampler at binding 1, then one `texture_2d` per texture slot from binding 2.
//! WGSL has no arrays of textures without extra device features, so the
//! texture count is baked in and `sample_slot` switches over the bindings.

use std::fmt::Write;

use tessera_test_utils::ShaderProgram;

/// First binding index used for texture slots.
pub(crate) const FIRST_TEXTURE_BINDING: u32 = 2;

/// Texture bindings a program declares for a given slot limit.
pub(crate) fn texture_count(program: ShaderProgram, slot_limit: u32) -> u32 {
    match program {
        ShaderProgram::Quad | ShaderProgram::Circle | ShaderProgram::Text => slot_limit,
        ShaderProgram::Line => 0,
        ShaderProgram::Fullscreen => 1,
    }
}

const COMMON: &str = r#"
struct Camera {
    view_projection: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> camera: Camera;
@group(0) @binding(1) var batch_sampler: sampler;
"#;

const QUAD_BODY: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) tex_coord: vec2<f32>,
    @location(3) tex_index: f32,
    @location(4) tiling: f32,
    @location(5) pick_id: u32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) tex_coord: vec2<f32>,
    @location(2) @interpolate(flat) tex_index: u32,
};

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_projection * vec4<f32>(input.position, 1.0);
    out.color = input.color;
    out.tex_coord = input.tex_coord * input.tiling;
    out.tex_index = u32(input.tex_index);
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return sample_slot(input.tex_index, input.tex_coord) * input.color;
}
"#;

const CIRCLE_BODY: &str = r#"
struct VertexInput {
    @location(0) world_position: vec3<f32>,
    @location(1) local_position: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) thickness: f32,
    @location(4) fade: f32,
    @location(5) tex_coord: vec2<f32>,
    @location(6) tex_index: f32,
    @location(7) pick_id: u32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local_position: vec2<f32>,
    @location(1) color: vec4<f32>,
    @location(2) thickness: f32,
    @location(3) fade: f32,
    @location(4) tex_coord: vec2<f32>,
    @location(5) @interpolate(flat) tex_index: u32,
};

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_projection * vec4<f32>(input.world_position, 1.0);
    out.local_position = input.local_position.xy;
    out.color = input.color;
    out.thickness = input.thickness;
    out.fade = input.fade;
    out.tex_coord = input.tex_coord;
    out.tex_index = u32(input.tex_index);
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let distance = 1.0 - length(input.local_position);
    var alpha = smoothstep(0.0, input.fade, distance);
    alpha *= 1.0 - smoothstep(input.thickness, input.thickness + input.fade, distance);
    if alpha <= 0.0 {
        discard;
    }
    let color = sample_slot(input.tex_index, input.tex_coord) * input.color;
    return vec4<f32>(color.rgb, color.a * alpha);
}
"#;

const LINE_BODY: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) pick_id: u32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_projection * vec4<f32>(input.position, 1.0);
    out.color = input.color;
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return input.color;
}
"#;

const TEXT_BODY: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) tex_coord: vec2<f32>,
    @location(3) tex_index: f32,
    @location(4) pick_id: u32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) tex_coord: vec2<f32>,
    @location(2) @interpolate(flat) tex_index: u32,
};

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_projection * vec4<f32>(input.position, 1.0);
    out.color = input.color;
    out.tex_coord = input.tex_coord;
    out.tex_index = u32(input.tex_index);
    return out;
}

// Glyph textures carry coverage in the red channel.
@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let coverage = sample_slot(input.tex_index, input.tex_coord).r;
    return vec4<f32>(input.color.rgb, input.color.a * coverage);
}
"#;

const FULLSCREEN_BODY: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) tex_coord: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coord: vec2<f32>,
};

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(input.position, 0.0, 1.0);
    out.tex_coord = input.tex_coord;
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return sample_slot(0u, input.tex_coord);
}
"#;

/// Full WGSL source of `program` with `texture_count(program, slot_limit)`
/// texture bindings.
pub(crate) fn source(program: ShaderProgram, slot_limit: u32) -> String {
    let count = texture_count(program, slot_limit);
    let mut wgsl = String::from(COMMON);

    if count > 0 {
        for slot in 0..count {
            let _ = writeln!(
                wgsl,
                "@group(0) @binding({}) var slot_{}: texture_2d<f32>;",
                FIRST_TEXTURE_BINDING + slot,
                slot
            );
        }
        wgsl.push_str("\nfn sample_slot(slot: u32, uv: vec2<f32>) -> vec4<f32> {\n    switch slot {\n");
        for slot in 0..count {
            let _ = writeln!(
                wgsl,
                "        case {}u: {{ return textureSampleLevel(slot_{}, batch_sampler, uv, 0.0); }}",
                slot, slot
            );
        }
        wgsl.push_str("        default: { return vec4<f32>(1.0, 0.0, 1.0, 1.0); }\n    }\n}\n");
    }

    wgsl.push_str(match program {
        ShaderProgram::Quad => QUAD_BODY,
        ShaderProgram::Circle => CIRCLE_BODY,
        ShaderProgram::Line => LINE_BODY,
        ShaderProgram::Text => TEXT_BODY,
        ShaderProgram::Fullscreen => FULLSCREEN_BODY,
    });
    wgsl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_bindings_follow_slot_limit() {
        let wgsl = source(ShaderProgram::Quad, 16);
        assert!(wgsl.contains("@binding(17) var slot_15"));
        assert!(wgsl.contains("case 15u"));
        assert!(!wgsl.contains("slot_16"));
    }

    #[test]
    fn test_line_program_has_no_textures() {
        let wgsl = source(ShaderProgram::Line, 16);
        assert!(!wgsl.contains("texture_2d"));
        assert!(!wgsl.contains("sample_slot"));
    }

    #[test]
    fn test_fullscreen_binds_one_texture() {
        assert_eq!(texture_count(ShaderProgram::Fullscreen, 32), 1);
        let wgsl = source(ShaderProgram::Fullscreen, 32);
        assert!(wgsl.contains("slot_0"));
        assert!(!wgsl.contains("slot_1"));
    }
}
