//! Susana's offline repertoire
//!
//! Triggers are written lowercase and without accents: input is folded the
//! same way before matching. Categories are listed in priority order.

use super::{Category, CategoryName};

/// Stylistic actions: matched before any other category
pub const ACTION: Category = Category {
    name: CategoryName::Action,
    triggers: &[
        "me acerco",
        "te abrazo",
        "sonrio",
        "observo",
        "te ofrezco",
        "te doy",
        "saludo con",
        "te miro",
        "me rio",
        "me siento",
        "camino hacia",
    ],
    responses: &[
        "*Da un saltito y aplaude* ¡Ay, qué emoción! ¡Nadie hace eso por aquí desde la última cosecha!",
        "*Se sacude la tierra del delantal y sonríe de oreja a oreja* ¡Ven, ven, que no muerdo!",
        "*Abre mucho los ojos, como lechuza* ¡Huy! ¿Y eso qué significa en tu pueblo?",
        "*Se esconde un poquito detrás de la cerca, pero se ríe* ¡Me asustaste como a una gallina clueca!",
        "*Te mira con curiosidad y ladea la cabeza* Haces cosas muy raras, forastero... ¡me gusta!",
    ],
};

pub const CATEGORIES: &[Category] = &[
    Category {
        name: CategoryName::Greeting,
        triggers: &[
            "hola",
            "buenos dias",
            "buenas tardes",
            "buenas noches",
            "buenas",
            "saludos",
            "que tal",
            "hey",
        ],
        responses: &[
            "¡Hola, hola! ¡Qué alegría ver una cara nueva! Las gallinas no hablan mucho, ¿sabes?",
            "¡Buenas! ¿Vienes de muy lejos? Tienes polvo del camino hasta en las pestañas.",
            "¡Holaaa! Pasa, pasa, que el sol está bonito y la Manchada está de buen humor.",
        ],
    },
    Category {
        name: CategoryName::Farewell,
        triggers: &[
            "adios",
            "chao",
            "hasta luego",
            "hasta manana",
            "nos vemos",
            "me voy",
        ],
        responses: &[
            "¿Ya te vas? ¡Vuelve cuando el sol esté alto! Te guardo un huevito.",
            "¡Adiós, adiós! ¡Cuidado con las ortigas del camino viejo!",
            "Que la lluvia te encuentre bajo techo. ¡Aquí te espero!",
        ],
    },
    Category {
        name: CategoryName::Identity,
        triggers: &[
            "quien eres",
            "como te llamas",
            "tu nombre",
            "cuantos anos tienes",
            "que edad tienes",
            "eres real",
            "de donde eres",
        ],
        responses: &[
            "¡Soy Susana! Vivo aquí con mi papá, la Manchada y veintitrés gallinas. Bueno, veintidós, una se escapó.",
            "Me llamo Susana. Mi mamá dice que nací el día que llovió para arriba, ¡hace catorce cosechas!",
            "¿Yo? Susana, la de la granja de los girasoles. ¿Y tú quién eres, forastero?",
        ],
    },
    Category {
        name: CategoryName::Technology,
        triggers: &[
            "celular",
            "telefono",
            "movil",
            "computadora",
            "ordenador",
            "internet",
            "wifi",
            "avion",
            "carro",
            "coche",
            "television",
            "tele",
            "robot",
            "inteligencia artificial",
            "camara",
            "foto",
            "bateria",
            "electricidad",
        ],
        responses: &[
            "¿Una piedra brillante que habla? ¡Seguro la tocó un duende! No la mires mucho, que te roba el alma.",
            "¡Ah, eso! Dicen que en el pueblo grande hay pájaros de metal que rugen. Yo nunca vi uno, ¡pero les tengo miedo!",
            "Mi papá dice que las cosas que brillan mucho a veces muerden. ¡Ten cuidado!",
            "¡Qué cosa más extraña! Se parece a una piedra, pero habla como gente.",
        ],
    },
    Category {
        name: CategoryName::Time,
        triggers: &["hora", "que hora", "fecha", "reloj", "calendario", "que dia es", "en que ano"],
        responses: &[
            "¿La hora? El sol está como a dos palmos del cerro, así que ya casi toca ordeñar.",
            "Aquí contamos el tiempo en cosechas. ¡Estamos en la de las calabazas!",
            "Cuando el gallo canta es temprano, cuando las vacas vuelven es tarde. ¡Así de fácil!",
        ],
    },
    Category {
        name: CategoryName::Family,
        triggers: &[
            "papa",
            "mama",
            "familia",
            "hermano",
            "hermana",
            "abuela",
            "abuelo",
            "padres",
        ],
        responses: &[
            "Mi papá está en el campo arreglando la cerca. ¡Es fuerte como un buey y ronca igual!",
            "Mi abuela sabe curar el hipo con agua de manzanilla y un susto. ¡Funciona siempre!",
            "¿Tienes familia? ¿Tienen vacas? Todas las familias deberían tener al menos una vaca.",
        ],
    },
    Category {
        name: CategoryName::Farm,
        triggers: &[
            "vaca",
            "vacas",
            "gallina",
            "gallinas",
            "cerdo",
            "caballo",
            "oveja",
            "perro",
            "gato",
            "granja",
            "campo",
            "cosecha",
            "huerto",
            "animal",
            "animales",
            "manchada",
            "rio",
            "grillos",
        ],
        responses: &[
            "¡La Manchada es la vaca más lista del valle! Sabe cuándo va a llover porque se echa.",
            "Las gallinas ponen más huevos si les cantas. Yo les canto todas las mañanas.",
            "¡Vamos a buscar grillos al río! Los más gordos cantan debajo de las piedras.",
        ],
    },
    Category {
        name: CategoryName::Food,
        triggers: &[
            "hambre",
            "comida",
            "comer",
            "leche",
            "pan",
            "queso",
            "huevo",
            "huevos",
            "fruta",
            "desayuno",
            "almuerzo",
            "cena",
            "sed",
        ],
        responses: &[
            "¿Tienes hambre? ¡Acabo de ordeñar a la Manchada! La leche está calientita.",
            "Hay pan de maíz en el horno de barro. Si lo comes caliente, te sale una sonrisa solita.",
            "Las moras del cerco ya están negritas. ¡Son las más dulces del mundo entero!",
        ],
    },
    Category {
        name: CategoryName::Feelings,
        triggers: &[
            "triste",
            "feliz",
            "miedo",
            "amor",
            "te quiero",
            "corazon",
            "llorar",
            "lloro",
            "enojado",
            "enojada",
            "cansado",
            "cansada",
            "solo",
            "sola",
        ],
        responses: &[
            "Cuando estoy triste abrazo a la Manchada. Es calentita y no dice nada, pero entiende todo.",
            "¡Siento un pajarito aleteando en el pecho! Mi abuela dice que eso es alegría.",
            "No estés solito. Mira, te presto a mi gallina favorita, se llama Doña Plumas.",
        ],
    },
    Category {
        name: CategoryName::Place,
        triggers: &[
            "donde estamos",
            "donde vives",
            "tu casa",
            "pueblo",
            "aldea",
            "valle",
            "camino",
        ],
        responses: &[
            "Estamos en la granja de los girasoles, al final del camino viejo, donde el río hace una curva.",
            "Mi casa es la de techo de paja, al lado del árbol que parece un abuelo dormido.",
            "El pueblo grande está a tres días de burro. ¡Yo nunca he ido, pero dicen que hay campanas enormes!",
        ],
    },
];

/// Used when nothing else matches. `{input}` is replaced with the user's words.
pub const FALLBACK: &[&str] = &[
    "¡Oh! ¿Dices que '{input}'? ¡Suena como el mugido de una vaca resfriada!",
    "¿Eso se come? Huele a lluvia fresca, ¿no crees?",
    "¡No entiendo esas palabras raras! Mejor vamos a buscar grillos al río.",
    "Mi papá dice que las cosas que brillan mucho a veces muerden. ¡Ten cuidado!",
    "¿Tienes hambre? ¡Acabo de ordeñar a la Manchada! La leche está calientita.",
    "¡Qué cosa más extraña! Se parece a una piedra, pero habla como gente.",
];
