//! `GET /api/menu` — the landing menu linking the three activities.

struct Adventure {
    title: &'static str,
    emoji: &'static str,
    gradient: &'static str,
    description: &'static str,
    path: &'static str,
}

const ADVENTURES: [Adventure; 3] = [
    Adventure {
        title: "Ciclo del Agua 3D",
        emoji: "\u{1F4A7}", // 💧
        gradient: "from-blue-400 to-cyan-400 hover:from-blue-500 hover:to-cyan-500",
        description: "Observa cómo el agua viaja por el cielo y la tierra.",
        path: "/three",
    },
    Adventure {
        title: "Mapa 3D Interactivo",
        emoji: "\u{1F5FA}\u{FE0F}", // 🗺️
        gradient: "from-green-400 to-emerald-400 hover:from-green-500 hover:to-emerald-500",
        description: "Explora cada región moviendo tus propias piezas.",
        path: "/mapa3d",
    },
    Adventure {
        title: "Simulador Robot 3D",
        emoji: "\u{1F916}", // 🤖
        gradient: "from-purple-400 to-pink-400 hover:from-purple-500 hover:to-pink-500",
        description: "Lleva al robot a nuevas aventuras paso a paso.",
        path: "/robots",
    },
];

pub fn handle(_query: &str) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str(r#"<section class="min-h-screen flex flex-col items-center justify-center gap-8 p-6">"#);
    html.push_str(
        r#"<h1 class="text-5xl font-black text-white drop-shadow-lg">¡Bienvenido! &#x1F31F;</h1>"#,
    );
    html.push_str(r#"<div class="grid gap-6 md:grid-cols-3 w-full max-w-5xl">"#);
    for (index, adventure) in ADVENTURES.iter().enumerate() {
        html.push_str(&format!(
            r#"<a href="{path}" style="animation-delay: {delay:.1}s; animation-fill-mode: both;" class="block rounded-3xl p-6 text-white shadow-xl bg-gradient-to-br {gradient} transition-transform hover:scale-105"><div class="text-6xl mb-4">{emoji}</div><h2 class="text-2xl font-black mb-2">{title}</h2><p class="text-sm font-semibold opacity-90">{description}</p></a>"#,
            path = adventure.path,
            delay = index as f32 * 0.2,
            gradient = adventure.gradient,
            emoji = adventure.emoji,
            title = adventure.title,
            description = adventure.description,
        ));
    }
    html.push_str("</div></section>");
    html
}
