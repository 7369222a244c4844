//! Repository tests against a live PostgreSQL.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p cinectl-server -- --ignored
//!
//! Each test opens a single-connection pool and creates TEMP tables on it.
//! Temporary tables shadow any permanent ones of the same name and vanish
//! with the connection, so the tests never touch real catalog data.

use chrono::NaiveDate;
use cinectl_server::db::repos::{DirectorRepo, FavoriteRepo, GenreRepo, MovieRepo, UserRepo};
use cinectl_server::db::{ConflictKind, ConnectionPool, DbError, PoolConfig, QueryExecutor};
use cinectl_server::models::{Email, NewFavorite, NewUser, PageRequest, SearchTerm};

const SCHEMA: &str = r#"
CREATE TEMP TABLE genero (
    id_genero INTEGER PRIMARY KEY,
    nombre TEXT NOT NULL
);
CREATE TEMP TABLE director (
    id_director INTEGER PRIMARY KEY,
    nombre TEXT NOT NULL,
    biografia TEXT,
    fecha_nacimiento DATE
);
CREATE TEMP TABLE pelicula (
    id_pelicula INTEGER PRIMARY KEY,
    nombre TEXT NOT NULL,
    sinopsis TEXT,
    imagen TEXT,
    trailer TEXT,
    id_genero INTEGER NOT NULL,
    duracion INTEGER,
    clasificacion TEXT,
    id_director INTEGER NOT NULL,
    anio INTEGER,
    reproducciones INTEGER
);
CREATE TEMP TABLE usuario (
    id_usuario SERIAL PRIMARY KEY,
    nombre TEXT NOT NULL,
    correo TEXT NOT NULL UNIQUE,
    "contraseña" TEXT NOT NULL,
    fecha_nacimiento DATE NOT NULL,
    suscripcion BOOLEAN NOT NULL
);
CREATE TEMP TABLE favorita_pelicula (
    id_usuario INTEGER NOT NULL,
    id_pelicula INTEGER NOT NULL,
    PRIMARY KEY (id_usuario, id_pelicula)
);

INSERT INTO genero VALUES (1, 'Animación'), (2, 'Drama'), (3, 'Documental');
INSERT INTO director VALUES
    (1, 'Hayao Miyazaki', 'Cofundador de Studio Ghibli', '1941-01-05'),
    (2, 'Lucrecia Martel', NULL, NULL);
"#;

async fn catalog() -> QueryExecutor {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let config = PoolConfig {
        max_connections: 1,
        min_connections: 1,
        ..PoolConfig::new(url)
    };
    let db = QueryExecutor::new(ConnectionPool::new(config));

    let pool = db.pool().get().await.expect("database reachable");
    sqlx::raw_sql(SCHEMA).execute(&pool).await.expect("schema created");
    db
}

/// 25 movies titled `Pelicula 01` to `Pelicula 25`, alternating genres 1 and 2.
async fn seed_movies(db: &QueryExecutor) {
    let pool = db.pool().get().await.unwrap();
    for n in 1..=25 {
        sqlx::query(
            "INSERT INTO pelicula (id_pelicula, nombre, id_genero, id_director, reproducciones)
             VALUES ($1, $2, $3, 1, $4)",
        )
        .bind(n)
        .bind(format!("Pelicula {:02}", n))
        .bind(if n % 2 == 0 { 2 } else { 1 })
        .bind(n * 100)
        .execute(&pool)
        .await
        .unwrap();
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn second_page_holds_ranks_eleven_to_twenty() {
    let db = catalog().await;
    seed_movies(&db).await;

    let page = MovieRepo::new(&db)
        .list(PageRequest::new(2, 10).unwrap())
        .await
        .unwrap();

    let names: Vec<_> = page.data.iter().map(|m| m.nombre.as_str()).collect();
    let expected: Vec<_> = (11..=20).map(|n| format!("Pelicula {:02}", n)).collect();
    assert_eq!(names, expected);
    assert_eq!(page.total_records, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.current_page, 2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn page_past_the_end_is_empty() {
    let db = catalog().await;
    seed_movies(&db).await;

    let page = MovieRepo::new(&db)
        .list(PageRequest::new(4, 10).unwrap())
        .await
        .unwrap();

    assert!(page.is_empty());
    assert_eq!(page.total_records, 25);
}

#[tokio::test]
#[ignore = "requires database"]
async fn genre_listing_counts_only_that_genre() {
    let db = catalog().await;
    seed_movies(&db).await;

    let page = MovieRepo::new(&db)
        .list_by_genre(2, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(page.total_records, 12);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.data.len(), 10);
    assert!(!GenreRepo::new(&db).exists(99).await.unwrap());
}

#[tokio::test]
#[ignore = "requires database"]
async fn top_played_is_ordered_by_plays() {
    let db = catalog().await;
    seed_movies(&db).await;

    let top = MovieRepo::new(&db).top_played().await.unwrap();
    let plays: Vec<_> = top.iter().map(|m| m.reproducciones.unwrap()).collect();

    assert_eq!(top.len(), 10);
    assert_eq!(plays.first(), Some(&2500));
    assert!(plays.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(top[0].detail.director, "Hayao Miyazaki");
}

#[tokio::test]
#[ignore = "requires database"]
async fn search_matches_genre_title_and_director_case_insensitively() {
    let db = catalog().await;
    let pool = db.pool().get().await.unwrap();
    sqlx::raw_sql(
        r#"
        INSERT INTO pelicula (id_pelicula, nombre, id_genero, id_director) VALUES
            (1, 'El viaje de Chihiro', 1, 1),
            (2, 'La ciénaga', 2, 2),
            (3, 'Mi vecino Totoro', 1, 1),
            (4, 'Zama', 2, 2),
            (5, 'Nuestro 100% de pelicula', 3, 2),
            (6, 'Animación japonesa', 3, 2);
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let movies = MovieRepo::new(&db);

    let hits = movies.search(&SearchTerm::new("anima").unwrap()).await.unwrap();
    let names: Vec<_> = hits.iter().map(|h| h.nombre.as_str()).collect();
    // title prefix match first, then the two matched through their genre
    assert_eq!(names, ["Animación japonesa", "El viaje de Chihiro", "Mi vecino Totoro"]);
    assert_eq!(hits[0].genero, "Documental");
    assert!(hits[1..].iter().all(|h| h.genero == "Animación"));

    let hits = movies.search(&SearchTerm::new("MARTEL").unwrap()).await.unwrap();
    assert_eq!(hits.len(), 4);

    let hits = movies.search(&SearchTerm::new("totoro").unwrap()).await.unwrap();
    assert_eq!(hits.len(), 1);

    // `%` in the term is matched literally
    let hits = movies.search(&SearchTerm::new("0%").unwrap()).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].nombre, "Nuestro 100% de pelicula");

    let hits = movies.search(&SearchTerm::new("kurosawa").unwrap()).await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn missing_director_is_none() {
    let db = catalog().await;
    let directors = DirectorRepo::new(&db);

    assert!(directors.get(999999).await.unwrap().is_none());

    let found = directors.get(1).await.unwrap().unwrap();
    assert_eq!(found.nombre, "Hayao Miyazaki");
    assert_eq!(found.fecha_nacimiento, NaiveDate::from_ymd_opt(1941, 1, 5));

    let listing = directors.list().await.unwrap();
    assert_eq!(listing.total_records, 2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_favorite_is_a_conflict() {
    let db = catalog().await;
    seed_movies(&db).await;
    let favorites = FavoriteRepo::new(&db);
    let favorite = NewFavorite {
        id_usuario: 1,
        id_pelicula: 7,
    };

    favorites.add(favorite).await.unwrap();
    let err = favorites.add(favorite).await.unwrap_err();

    assert!(matches!(
        err,
        DbError::Conflict {
            kind: ConflictKind::DuplicateFavorite,
            ..
        }
    ));

    let listed = favorites.list_for_user(1).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].nombre, "Pelicula 07");
}

#[tokio::test]
#[ignore = "requires database"]
async fn registered_user_round_trips_through_password_column() {
    let db = catalog().await;
    let users = UserRepo::new(&db);
    let user = NewUser {
        nombre: "Ana".into(),
        correo: Email::new("ana@example.com").unwrap(),
        contrasena: "s3creto".into(),
        fecha_nacimiento: NaiveDate::from_ymd_opt(1990, 4, 1).unwrap(),
        suscripcion: true,
    };

    users.create(&user, "$argon2id$placeholder").await.unwrap();
    assert!(users.email_taken(&user.correo).await.unwrap());

    let stored = users.find_by_email(&user.correo).await.unwrap().unwrap();
    assert_eq!(stored.contrasena, "$argon2id$placeholder");

    assert!(users.set_password(stored.id_usuario, "$argon2id$other").await.unwrap());
    let all = users.all_credentials().await.unwrap();
    assert_eq!(all[0].contrasena, "$argon2id$other");

    let err = users.create(&user, "x").await.unwrap_err();
    assert!(matches!(
        err,
        DbError::Conflict {
            kind: ConflictKind::DuplicateEmail,
            ..
        }
    ));
}
