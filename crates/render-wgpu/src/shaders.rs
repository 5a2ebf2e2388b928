/// Clip-space quad with interpolated vertex colours.
pub const QUAD_SHADER: &str = r#"
struct QuadInput {
    @location(0) position: vec2<f32>,
    @location(1) color: vec3<f32>,
};

struct QuadOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_quad(vertex: QuadInput) -> QuadOutput {
    var out: QuadOutput;
    out.clip_position = vec4<f32>(vertex.position, 0.0, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_quad(in: QuadOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;

/// Textured cube: separate projection, view and model matrices.
pub const SKYBOX_SHADER: &str = r#"
struct Transforms {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
    model: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> transforms: Transforms;
@group(0) @binding(1)
var atlas: texture_2d<f32>;
@group(0) @binding(2)
var atlas_sampler: sampler;

struct SkyboxInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct SkyboxOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_skybox(vertex: SkyboxInput) -> SkyboxOutput {
    var out: SkyboxOutput;
    out.clip_position = transforms.projection * transforms.view * transforms.model
        * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_skybox(in: SkyboxOutput) -> @location(0) vec4<f32> {
    return textureSample(atlas, atlas_sampler, in.uv);
}
"#;

/// Instanced scene meshes with baked vertex colours.
///
/// Light colours arrive premultiplied by intensity. Point and spot lights
/// carry their cut-off distance in `position.w` and decay in `color.w`;
/// spot lights carry the cosine of the cone angle in `direction.w`.
pub const SCENE_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
};

struct DirectionalLight {
    direction: vec4<f32>,
    color: vec4<f32>,
};

struct PointLight {
    position: vec4<f32>,
    color: vec4<f32>,
};

struct SpotLight {
    position: vec4<f32>,
    direction: vec4<f32>,
    color: vec4<f32>,
};

struct Lights {
    ambient: vec4<f32>,
    sky: vec4<f32>,
    ground: vec4<f32>,
    counts: vec4<u32>,
    directional: array<DirectionalLight, 4>,
    point: array<PointLight, 4>,
    spot: array<SpotLight, 4>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;
@group(0) @binding(1)
var<uniform> lights: Lights;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
    // x: opacity, y: 1 for lit shading
    @location(7) params: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) params: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = camera.view_proj * world_pos;
    out.world_position = world_pos.xyz;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.color = vertex.color;
    out.params = instance.params;
    return out;
}

fn range_falloff(dist: f32, range: f32, decay: f32) -> f32 {
    var falloff = 1.0 / max(pow(dist, decay), 0.01);
    if (range > 0.0) {
        let ratio = dist / range;
        falloff = falloff * pow(clamp(1.0 - ratio * ratio * ratio * ratio, 0.0, 1.0), 2.0);
    }
    return falloff;
}

fn blinn_phong(n: vec3<f32>, l: vec3<f32>, v: vec3<f32>, radiance: vec3<f32>, albedo: vec3<f32>) -> vec3<f32> {
    let diffuse = max(dot(n, l), 0.0);
    let h = normalize(l + v);
    let specular = pow(max(dot(n, h), 0.0), 30.0) * 0.3;
    return radiance * (albedo * diffuse + vec3<f32>(specular));
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    let alpha = in.color.a * in.params.x;
    if (in.params.y < 0.5) {
        return vec4<f32>(in.color.rgb, alpha);
    }

    var n = normalize(in.world_normal);
    if (!front) {
        n = -n;
    }
    let v = normalize(camera.eye.xyz - in.world_position);
    let albedo = in.color.rgb;

    let hemi = mix(lights.ground.rgb, lights.sky.rgb, 0.5 * n.y + 0.5);
    var color = albedo * (lights.ambient.rgb + hemi);

    for (var i = 0u; i < lights.counts.x; i = i + 1u) {
        let light = lights.directional[i];
        color += blinn_phong(n, normalize(light.direction.xyz), v, light.color.rgb, albedo);
    }

    for (var i = 0u; i < lights.counts.y; i = i + 1u) {
        let light = lights.point[i];
        let to_light = light.position.xyz - in.world_position;
        let dist = length(to_light);
        let radiance = light.color.rgb * range_falloff(dist, light.position.w, light.color.w);
        color += blinn_phong(n, to_light / max(dist, 1e-4), v, radiance, albedo);
    }

    for (var i = 0u; i < lights.counts.z; i = i + 1u) {
        let light = lights.spot[i];
        let to_light = light.position.xyz - in.world_position;
        let dist = length(to_light);
        let l = to_light / max(dist, 1e-4);
        let cos_cone = light.direction.w;
        let cos_theta = dot(-l, normalize(light.direction.xyz));
        let cone = smoothstep(cos_cone, mix(cos_cone, 1.0, 0.1), cos_theta);
        let radiance = light.color.rgb * cone * range_falloff(dist, light.position.w, light.color.w);
        color += blinn_phong(n, l, v, radiance, albedo);
    }

    return vec4<f32>(color, alpha);
}
"#;

/// Helper lines: axes, grids, light markers.
pub const LINE_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

struct LineInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(vertex: LineInput) -> LineOutput {
    var out: LineOutput;
    out.clip_position = camera.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_line(in: LineOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
