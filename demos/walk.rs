use std::sync::Arc;

use macroquad::prelude::*;
use macroquad_tile_world::{
    ActorList, BlockSprite, DepthCompositor, DirAssets, DirectionKeys, FollowCamera,
    GridMotionController, MacroquadCanvas, MacroquadKeyboard, MapCollision, MapLoader,
    StageConfig, TextureCache, TileCatalog, TileRef, WorldMap,
};
use tracing_subscriber::EnvFilter;

const TILESET: &str = r#"{"tiles":[
  {"x":0,"y":0,"w":32,"h":32},
  {"x":32,"y":0,"w":32,"h":32,"layer":"object","l":true,"r":true,"u":true,"d":true},
  {"x":64,"y":0,"w":32,"h":32,"layer":"object","top":true}
]}"#;

fn window_conf() -> Conf {
    Conf {
        window_title: "Walk".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Grass, stone and treetop swatches side by side.
fn generated_tileset() -> Texture2D {
    let mut img = Image::gen_image_color(96, 32, DARKGREEN);
    for y in 0..32 {
        for x in 32..64 {
            img.set_pixel(x, y, GRAY);
        }
        for x in 64..96 {
            let c = if (x + y) % 4 == 0 { LIME } else { GREEN };
            img.set_pixel(x, y, c);
        }
    }
    let tex = Texture2D::from_image(&img);
    tex.set_filter(FilterMode::Nearest);
    tex
}

fn generated_map(grid: Vec2) -> anyhow::Result<WorldMap> {
    let cat = Arc::new(TileCatalog::load("demo.png", TILESET)?);
    let mut b = WorldMap::builder();
    b.grid(grid.x, grid.y).catalog(cat);
    for gy in 0..30 {
        for gx in 0..40 {
            b.place(TileRef::new("demo.png", 0, 0), gx, gy, 0);
            let border = gx == 0 || gy == 0 || gx == 39 || gy == 29;
            if border || (gx % 7 == 3 && gy % 5 == 2) {
                b.place(TileRef::new("demo.png", 32, 0), gx, gy, 0);
            }
            if gx % 9 == 5 && gy % 6 == 4 {
                b.place(TileRef::new("demo.png", 32, 0), gx, gy, 0);
                b.place(TileRef::new("demo.png", 64, 0), gx, gy, 1);
            }
        }
    }
    Ok(b.build()?)
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        tracing::error!("{e:#}");
    }
}

async fn run() -> anyhow::Result<()> {
    // walk [stage.json] [assets_dir map.json]
    let args: Vec<String> = std::env::args().collect();
    let config = match args.get(1) {
        Some(path) => StageConfig::load(path)?,
        None => StageConfig::default(),
    };

    let mut textures = TextureCache::new();
    let map = match (args.get(2), args.get(3)) {
        (Some(dir), Some(name)) => {
            let mut loader = MapLoader::new(DirAssets::new(dir)).with_grid(config.grid());
            let map = loader.load_map(name)?;
            loader.load_textures(&map, &mut textures)?;
            map
        }
        _ => {
            textures.insert("demo.png", generated_tileset());
            generated_map(config.grid())?
        }
    };
    let map = Arc::new(map);

    let mut actors = ActorList::new();
    let hero = actors.add(BlockSprite::new(
        vec2(config.tile_width, config.tile_height) * 2.0,
        config.grid(),
        ORANGE,
    ));

    let mut collision = MapCollision::new(map.clone());
    if config.confine_to_map {
        collision = collision.confined();
    }
    let mut motion = GridMotionController::new(config.motion, DirectionKeys::from(config.keys));
    motion.control(hero);
    motion.add_collision(collision);

    let mut camera = FollowCamera::new();
    camera.track(Some(hero));
    if config.clamp_camera {
        camera.set_world_size(Some(map.pixel_size()));
    }

    let mut compositor = DepthCompositor::new(config.composite);
    let keyboard = MacroquadKeyboard;

    loop {
        let ms = get_frame_time() * 1000.0;
        motion.input(&keyboard, &mut actors);
        motion.update(ms, &mut actors);
        actors.update(ms);

        let viewport = vec2(screen_width(), screen_height());
        camera.update(ms, &actors, viewport);
        compositor.set_view(Some(camera.view_rect()));

        clear_background(BLACK);
        let mut canvas = MacroquadCanvas::new(&textures);
        camera.render(&mut canvas, |c| compositor.render(&map, &actors, c));

        draw_text(&format!("FPS: {}", get_fps()), 20.0, 30.0, 30.0, RED);
        next_frame().await;
    }
}
