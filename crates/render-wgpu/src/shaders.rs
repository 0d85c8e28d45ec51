//! WGSL sources. Both pipelines share the view-projection uniform at
//! group 0, binding 0, and fade toward the clear color with view depth so the
//! far end of a long level dissolves instead of clipping.

/// Instanced, flat-lit boxes. Each instance carries a model matrix that
/// scales and places the unit cube, plus a color.
pub const BOX_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

const FOG_COLOR: vec3<f32> = vec3<f32>(0.06, 0.06, 0.08);
const FOG_START: f32 = 60.0;
const FOG_END: f32 = 220.0;

struct Vertex {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct Instance {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct Varyings {
    @builtin(position) clip: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) fog: f32,
};

@vertex
fn vs_main(vertex: Vertex, instance: Instance) -> Varyings {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    // Boxes are scaled but never rotated or sheared, so the normal only needs
    // renormalizing after the non-uniform scale.
    let normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: Varyings;
    out.clip = uniforms.view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.normal = normalize(normal);
    out.color = instance.color;
    out.fog = clamp((out.clip.w - FOG_START) / (FOG_END - FOG_START), 0.0, 1.0);
    return out;
}

@fragment
fn fs_main(in: Varyings) -> @location(0) vec4<f32> {
    let light_dir = normalize(vec3<f32>(-0.4, 1.0, 0.6));
    let diffuse = max(dot(in.normal, light_dir), 0.0);
    let lit = in.color.rgb * (0.35 + diffuse * 0.65);
    return vec4<f32>(mix(lit, FOG_COLOR, in.fog), in.color.a);
}
"#;

/// Unlit ground grid lines.
pub const GRID_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

const FOG_COLOR: vec3<f32> = vec3<f32>(0.06, 0.06, 0.08);
const FOG_START: f32 = 60.0;
const FOG_END: f32 = 220.0;

struct GridVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct GridVaryings {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) fog: f32,
};

@vertex
fn vs_grid(vertex: GridVertex) -> GridVaryings {
    var out: GridVaryings;
    out.clip = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    out.fog = clamp((out.clip.w - FOG_START) / (FOG_END - FOG_START), 0.0, 1.0);
    return out;
}

@fragment
fn fs_grid(in: GridVaryings) -> @location(0) vec4<f32> {
    return vec4<f32>(mix(in.color.rgb, FOG_COLOR, in.fog), in.color.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_points_match_pipelines() {
        assert!(BOX_SHADER.contains("fn vs_main"));
        assert!(BOX_SHADER.contains("fn fs_main"));
        assert!(GRID_SHADER.contains("fn vs_grid"));
        assert!(GRID_SHADER.contains("fn fs_grid"));
    }

    #[test]
    fn instance_locations_follow_vertex_attributes() {
        for location in 2..=6 {
            assert!(BOX_SHADER.contains(&format!("@location({location})")));
        }
    }
}
