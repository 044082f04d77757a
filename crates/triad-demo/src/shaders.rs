//! GLSL sources for the demo scenes. Both vertex stages offset the geometry
//! by `u_offset` in clip space so several meshes can share the screen.

pub const COLOR_VERTEX: &str = r#"#version 330 core
layout (location = 0) in vec3 a_position;
layout (location = 1) in vec3 a_color;

uniform vec2 u_offset;

out vec3 v_color;

void main() {
    gl_Position = vec4(a_position.xy + u_offset, a_position.z, 1.0);
    v_color = a_color;
}
"#;

pub const COLOR_FRAGMENT: &str = r#"#version 330 core
in vec3 v_color;

out vec4 frag_color;

void main() {
    frag_color = vec4(v_color, 1.0);
}
"#;

pub const TEXTURED_VERTEX: &str = r#"#version 330 core
layout (location = 0) in vec3 a_position;
layout (location = 1) in vec2 a_uv;

uniform vec2 u_offset;

out vec2 v_uv;

void main() {
    gl_Position = vec4(a_position.xy + u_offset, a_position.z, 1.0);
    v_uv = a_uv;
}
"#;

pub const TEXTURED_FRAGMENT: &str = r#"#version 330 core
in vec2 v_uv;

uniform sampler2D u_texture;
uniform vec4 u_tint;

out vec4 frag_color;

void main() {
    frag_color = texture(u_texture, v_uv) * u_tint;
}
"#;
