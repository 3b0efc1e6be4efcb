fn gl_generate() {
    use gl_generator::{Api, Fallbacks, Profile, Registry};
    use std::{env, fs::File, path::PathBuf};

    let dest = PathBuf::from(&env::var("OUT_DIR").unwrap());

    let mut file = File::create(dest.join("egl_bindings.rs")).unwrap();
    Registry::new(
        Api::Egl,
        (1, 5),
        Profile::Core,
        Fallbacks::All,
        [
            "EGL_EXT_platform_base",
            "EGL_KHR_platform_wayland",
            "EGL_EXT_platform_wayland",
        ],
    )
    .write_bindings(gl_generator::GlobalGenerator, &mut file)
    .unwrap();

    // The context is created against EGL_OPENGL_API, so desktop GL it is.
    let mut file = File::create(dest.join("gl_bindings.rs")).unwrap();
    Registry::new(Api::Gl, (2, 0), Profile::Core, Fallbacks::None, [])
        .write_bindings(gl_generator::StructGenerator, &mut file)
        .unwrap();
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    gl_generate();
}
