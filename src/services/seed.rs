use tracing::info;

use crate::db::{DocumentStore, KeyValueBackend, StoreResult};
use crate::models::{NewCategory, NewService, Service, ServiceCategory, UnitOfMeasure};

use crate::models::UnitOfMeasure::{Event, Pair, Piece, Service as Svc, Table};

const CATEGORIES: [&str; 7] = [
    "Allestimento Chiesa",
    "Allestimento Location",
    "Casa Sposa",
    "Casa Sposo",
    "Servizi Extra",
    "Pacchetti Compleanno",
    "Pacchetti Battesimo / Comunione",
];

struct SeedService {
    category: usize,
    name: &'static str,
    description: &'static str,
    price: f64,
    unit: UnitOfMeasure,
    transport: bool,
}

const fn svc(
    category: usize,
    name: &'static str,
    description: &'static str,
    price: f64,
    unit: UnitOfMeasure,
) -> SeedService {
    SeedService {
        category,
        name,
        description,
        price,
        unit,
        transport: false,
    }
}

const fn with_transport(mut service: SeedService) -> SeedService {
    service.transport = true;
    service
}

// Category indexes point into CATEGORIES.
const SERVICES: [SeedService; 34] = [
    svc(0, "Broken Arch grande (esterno)", "Struttura ad arco spezzato grande per esterno chiesa con composizioni floreali", 450.0, Piece),
    svc(0, "Broken Arch piccolo (interno)", "Struttura ad arco spezzato piccolo per interno chiesa", 350.0, Piece),
    svc(0, "Composizione tavolo celebrativo", "Composizione floreale per il tavolo della cerimonia", 120.0, Piece),
    svc(0, "Composizioni a festoni per balaustre (x2)", "Coppia di festoni floreali per balaustre della chiesa", 280.0, Pair),
    svc(0, "Composizione floreale crocefisso", "Composizione floreale decorativa per il crocefisso", 90.0, Piece),
    svc(0, "Composizioni altare maggiore (x2)", "Coppia di composizioni floreali per altare maggiore", 320.0, Pair),
    svc(0, "Bottoniere", "Bottoniera floreale per giacca", 15.0, Piece),
    svc(0, "Bouquet sposa", "Bouquet da sposa con fiori selezionati", 180.0, Piece),
    svc(0, "Bouquet lancio", "Bouquet per il lancio della sposa", 80.0, Piece),
    svc(0, "Corner riso con accessori", "Angolo riso completo con cesti e accessori", 150.0, Piece),
    svc(0, "Decorazione floreale auto con nastri", "Decorazione floreale per auto sposi con nastri coordinati", 120.0, Piece),
    svc(1, "Centrotavola con candelieri e composizione su alzatina", "Centrotavola elegante con candelieri e composizione su alzatina", 45.0, Table),
    svc(1, "Tableau de mariage personalizzato", "Tableau de mariage con grafica personalizzata e decorazione floreale", 200.0, Piece),
    svc(1, "Runner in tessuto per tavoli aperitivo", "Runner decorativo in tessuto per tavolo aperitivo", 25.0, Piece),
    svc(1, "Tavolo sposi completo", "Allestimento completo tavolo degli sposi con composizioni floreali", 350.0, Piece),
    svc(1, "Tavolo torta completo", "Allestimento completo del tavolo torta nuziale", 200.0, Piece),
    svc(1, "Tavolo confetti completo con accessori", "Tavolo confettata con sacchettini, nastri e accessori", 250.0, Piece),
    svc(1, "Tavolo rum e sigari con accessori", "Angolo rum e sigari con decorazione e accessori", 300.0, Piece),
    svc(1, "Sistemazione bomboniere", "Disposizione e allestimento bomboniere", 100.0, Svc),
    svc(2, "Composizioni floreali ingresso principale (su struttura)", "Composizioni floreali decorative su struttura per ingresso", 250.0, Piece),
    svc(2, "Tavolo dolci completo", "Allestimento tavolo dolci con decorazioni floreali", 200.0, Piece),
    svc(2, "Decorazione scala con bouquet di nebbia e nastri", "Decorazione della scala con composizioni di nebbiolina e nastri", 180.0, Piece),
    svc(3, "Composizioni floreali ingresso principale", "Composizioni floreali per ingresso casa sposo", 180.0, Piece),
    svc(3, "Tavolo dolci completo", "Allestimento tavolo dolci casa sposo", 180.0, Piece),
    with_transport(svc(4, "Wedding Coordinator", "Servizio di coordinamento dalla firma del contratto al giorno dell'evento", 1500.0, Event)),
    with_transport(svc(4, "Trasporto e montaggio", "Servizio di trasporto materiali e montaggio allestimenti", 400.0, Svc)),
    with_transport(svc(4, "Smontaggio post-evento", "Servizio di smontaggio e ritiro materiali post-evento", 250.0, Svc)),
    svc(5, "Allestimento tavolo torta", "Decorazione completa tavolo torta per compleanno", 150.0, Piece),
    svc(5, "Palloncini e strutture", "Archi e strutture con palloncini", 200.0, Svc),
    svc(5, "Centrotavola tematici", "Centrotavola a tema per festa di compleanno", 30.0, Table),
    svc(5, "Backdrop personalizzato", "Fondale fotografico personalizzato con tema", 350.0, Piece),
    svc(6, "Allestimento chiesa (piccolo)", "Allestimento floreale chiesa formato ridotto", 200.0, Svc),
    svc(6, "Centrotavola bimbi", "Centrotavola delicato per battesimo/comunione", 25.0, Table),
    svc(6, "Confettata completa", "Tavolo confettata con accessori e sacchettini", 200.0, Svc),
];

/// Loads the starter catalogue into an empty store.
///
/// Runs once per store: the `seeded` marker is written afterwards and later
/// calls return `false` without touching anything, even if the user has since
/// deleted every category.
pub fn seed_catalogue<B: KeyValueBackend>(store: &DocumentStore<B>) -> StoreResult<bool> {
    if store.is_seeded()? {
        return Ok(false);
    }

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (idx, name) in CATEGORIES.iter().enumerate() {
        let category = store.create::<ServiceCategory>(NewCategory {
            name: name.to_string(),
            sort_order: idx as i64 + 1,
        })?;
        category_ids.push(category.id);
    }

    let mut position = vec![0_i64; CATEGORIES.len()];
    for seed in &SERVICES {
        position[seed.category] += 1;
        store.create::<Service>(NewService {
            category_id: category_ids[seed.category],
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            base_price: seed.price,
            unit: seed.unit,
            transport_included: seed.transport,
            image_path: None,
            sort_order: position[seed.category],
        })?;
    }

    store.mark_seeded()?;
    info!(
        categories = CATEGORIES.len(),
        services = SERVICES.len(),
        "catalogue seeded"
    );
    Ok(true)
}
