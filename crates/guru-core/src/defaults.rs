//! Bundled seed data
//!
//! The seed articles are shown when neither the remote store nor the local
//! cache has anything, and they are what `guru seed` writes to an empty
//! remote collection. Their ids are protected from deletion.

use crate::models::{Article, Category, Intel, SiteConfig};

/// Ids of the bundled articles (protected from deletion)
pub const SEED_IDS: [&str; 2] = ["cinque-terre-cloud", "amalfi-cloud"];

const CINQUE_TERRE_CONTENT: &str = "Incastonate lungo la costa frastagliata della Liguria, le Cinque Terre rappresentano uno dei paesaggi più iconici e fotografati d'Italia. Questi cinque borghi marinari – Monterosso al Mare, Vernazza, Corniglia, Manarola e Riomaggiore – sono un capolavoro dove l'uomo e la natura convivono in perfetta armonia.

## Un Patrimonio UNESCO da Esplorare

Dal 1997, le Cinque Terre sono Patrimonio dell'Umanità UNESCO, riconoscimento che celebra secoli di lavoro umano nel plasmare terrazzamenti a vigneto su pendii impossibili. Passeggiare tra i sentieri che collegano i borghi significa immergersi in panorami mozzafiato dove il blu intenso del Mar Ligure incontra il verde brillante della macchia mediterranea.

## Vernazza: Il Cuore Pulsante

Considerato da molti il borgo più bello, Vernazza incanta con la sua piazzetta affacciata sul porto, le case color pastello e l'antica torre genovese. Il tramonto qui è un'esperienza da non perdere: i raggi dorati illuminano le facciate creando giochi di luce indimenticabili.

> \"Vernazza non è solo un luogo, è un'emozione che si imprime nel cuore di ogni viaggiatore.\"

## Manarola e i Vigneti Eroici

Manarola è famosa per i suoi **vigneti a strapiombo sul mare**, dove si produce lo Sciacchetrà, prezioso vino dolce ligure. Il panorama dal belvedere è semplicemente spettacolare, soprattutto al crepuscolo quando le luci del borgo si accendono creando un'atmosfera magica.

## Consigli Pratici per la Visita

Il periodo migliore va da **aprile a giugno** e **settembre-ottobre**, evitando la folla estiva. Il treno è il modo più comodo per spostarsi tra i borghi, ma i sentieri escursionistici offrono le viste più spettacolari. Non dimenticate di assaggiare le specialità locali: focaccia ligure croccante, acciughe fresche di Monterosso, e ovviamente il pesto genovese autentico preparato ancora con il mortaio.";

const AMALFI_CONTENT: &str = "## The Forgotten Path to Ravello

While most visitors take the winding bus route up the mountain, those seeking true tranquility opt for the ancient mule tracks. These **scalinatella** weave through terrace after terrace of citrus trees.

> The real magic of the coast isn't in the maps, but in the stairs you didn't plan to climb.

![The vertical gardens of Ravello produce the world's finest lemons.](https://images.unsplash.com/photo-1533604131587-3282c3f3ecbb?auto=format&fit=crop&q=80&w=1200)";

/// The bundled article set, newest first
pub fn articles() -> Vec<Article> {
    let mut cinque_terre = Article::with_id(
        SEED_IDS[0],
        "Le Cinque Terre: Un Viaggio tra Borghi Sospesi tra Cielo e Mare",
    );
    cinque_terre.location = "LIGURIA, ITALY".to_string();
    cinque_terre.category = Category::Adventure;
    cinque_terre.image_url =
        "https://images.unsplash.com/photo-1516483638261-f4dbaf036963?w=1600".to_string();
    cinque_terre.card_image_url =
        Some("https://images.unsplash.com/photo-1516483638261-f4dbaf036963?w=800".to_string());
    cinque_terre.hero_image_url =
        Some("https://images.unsplash.com/photo-1516483638261-f4dbaf036963?w=1600".to_string());
    cinque_terre.description = Some(
        "Cinque perle colorate incastonate nella roccia, dove i vigneti sfidano la gravità e ogni \
         vicolo racconta storie di pescatori e tradizioni millenarie. Scopri la magia della \
         Riviera Ligure più autentica."
            .to_string(),
    );
    cinque_terre.content = CINQUE_TERRE_CONTENT.to_string();
    cinque_terre.intel = Some(Intel {
        best_time: "Aprile-Giugno, Settembre-Ottobre".to_string(),
        budget: "Moderato".to_string(),
        must_try: "Sciacchetrà, Focaccia, Pesto al mortaio".to_string(),
        vibe: Some("Romantico & Pittoresco".to_string()),
    });
    cinque_terre.published = Some(true);

    let mut amalfi = Article::with_id(SEED_IDS[1], "Hidden Gems of the Amalfi Coast");
    amalfi.location = "CAMPANIA, ITALY".to_string();
    amalfi.category = Category::Europe;
    amalfi.image_url = unsplash("photo-1533105079780-92b9be482077", 80, 1200);
    amalfi.card_image_url = Some(unsplash("photo-1533105079780-92b9be482077", 80, 800));
    amalfi.hero_image_url = Some(unsplash("photo-1533105079780-92b9be482077", 80, 1600));
    amalfi.description = Some(
        "Beyond the glittering facades of Positano and the bustling squares of Amalfi lies a \
         different coast. One where lemon groves hang heavy over forgotten stone paths."
            .to_string(),
    );
    amalfi.content = AMALFI_CONTENT.to_string();
    amalfi.intel = Some(Intel {
        best_time: "May to September".to_string(),
        budget: "High / Luxury".to_string(),
        must_try: "Limoncello Spritz".to_string(),
        vibe: Some("Authentic & Vertical".to_string()),
    });
    amalfi.published = Some(true);

    vec![cinque_terre, amalfi]
}

/// Check whether an id belongs to a bundled article
pub fn is_seed_article(id: &str) -> bool {
    SEED_IDS.contains(&id)
}

/// Homepage settings used until an admin saves their own
pub fn site_config() -> SiteConfig {
    SiteConfig {
        hero_image_url: unsplash("photo-1559128010-7c1ad6e1b6a5", 90, 2400),
        hero_title: "Explore the".to_string(),
        hero_subtitle: "Raw perspectives and untold stories from the furthest corners of the globe."
            .to_string(),
        hero_highlight: "Unseen.".to_string(),
    }
}

fn unsplash(photo: &str, quality: u8, width: u32) -> String {
    format!("https://images.unsplash.com/{photo}?auto=format&fit=crop&q={quality}&w={width}")
}
