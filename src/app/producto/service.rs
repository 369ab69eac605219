//! Producto business service: trait seam plus its implementations.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::model::{Categoria, Producto};
use crate::core::error::CoreError;

/// Data-access collaborator injected into every handler.
///
/// Lookups return `Option` so "not found" is a value, never a blank
/// placeholder instance to be inspected for a missing id.
#[async_trait]
pub trait ProductoService: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Producto>, CoreError>;

    /// All products with `nombre` upper-cased by the data layer.
    async fn find_all_nombre_upper(&self) -> Result<Vec<Producto>, CoreError>;

    /// Upper-cased listing repeated `veces` times, for the buffered and
    /// chunked delivery demos.
    async fn find_all_nombre_upper_repeat(&self, veces: usize) -> Result<Vec<Producto>, CoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Producto>, CoreError>;

    /// Persist the product, assigning an id when it has none.
    async fn save(&self, producto: Producto) -> Result<Producto, CoreError>;

    async fn delete(&self, id: &str) -> Result<(), CoreError>;

    async fn find_all_categorias(&self) -> Result<Vec<Categoria>, CoreError>;

    async fn find_categoria_by_id(&self, id: &str) -> Result<Option<Categoria>, CoreError>;
}

/// In-memory store backing the default build and the test suite.
pub struct InMemoryProductoService {
    productos: Mutex<HashMap<String, Producto>>,
    categorias: Vec<Categoria>,
}

impl InMemoryProductoService {
    pub fn new() -> Self {
        Self {
            productos: Mutex::new(HashMap::new()),
            categorias: vec![
                Categoria::new("1", "Electronico"),
                Categoria::new("2", "Deporte"),
                Categoria::new("3", "Computacion"),
                Categoria::new("4", "Muebles"),
                Categoria::new("5", "Electrodomestico"),
            ],
        }
    }

    /// Seed the sample catalog used by the demo binary.
    pub fn with_sample_data() -> Self {
        let service = Self::new();
        let electronico = service.categorias[0].clone();
        let computacion = service.categorias[2].clone();
        let muebles = service.categorias[3].clone();

        let muestras = vec![
            Producto::new("TV Panasonic Pantalla LCD", 456.89, electronico.clone()),
            Producto::new("Sony Camara HD Digital", 177.89, electronico.clone()),
            Producto::new("Apple iPod", 46.89, electronico),
            Producto::new("Sony Notebook", 846.89, computacion.clone()),
            Producto::new("Hewlett Packard Multifuncional", 200.89, computacion),
            Producto::new("Mica Comoda 5 Cajones", 150.89, muebles),
        ];

        {
            let mut productos = service.productos.lock().unwrap();
            for mut p in muestras {
                let id = Uuid::new_v4().to_string();
                p.id = Some(id.clone());
                p.create_at = Some(Utc::now());
                productos.insert(id, p);
            }
        }
        service
    }

    fn sorted(productos: &HashMap<String, Producto>) -> Vec<Producto> {
        let mut lista: Vec<Producto> = productos.values().cloned().collect();
        lista.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        lista
    }
}

impl Default for InMemoryProductoService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductoService for InMemoryProductoService {
    async fn find_all(&self) -> Result<Vec<Producto>, CoreError> {
        let productos = self.productos.lock().unwrap();
        Ok(Self::sorted(&productos))
    }

    async fn find_all_nombre_upper(&self) -> Result<Vec<Producto>, CoreError> {
        let mut lista = self.find_all().await?;
        for p in &mut lista {
            p.nombre = p.nombre.to_uppercase();
        }
        Ok(lista)
    }

    async fn find_all_nombre_upper_repeat(&self, veces: usize) -> Result<Vec<Producto>, CoreError> {
        let base = self.find_all_nombre_upper().await?;
        let mut lista = Vec::with_capacity(base.len() * veces);
        for _ in 0..veces {
            lista.extend(base.iter().cloned());
        }
        Ok(lista)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Producto>, CoreError> {
        let productos = self.productos.lock().unwrap();
        Ok(productos.get(id).cloned())
    }

    async fn save(&self, mut producto: Producto) -> Result<Producto, CoreError> {
        let mut productos = self.productos.lock().unwrap();
        let id = match &producto.id {
            Some(id) => id.clone(),
            None => {
                let id = Uuid::new_v4().to_string();
                producto.id = Some(id.clone());
                id
            }
        };
        productos.insert(id, producto.clone());
        Ok(producto)
    }

    async fn delete(&self, id: &str) -> Result<(), CoreError> {
        let mut productos = self.productos.lock().unwrap();
        match productos.remove(id) {
            Some(_) => Ok(()),
            None => Err(CoreError::NotFound(format!("no existe el producto {}", id))),
        }
    }

    async fn find_all_categorias(&self) -> Result<Vec<Categoria>, CoreError> {
        Ok(self.categorias.clone())
    }

    async fn find_categoria_by_id(&self, id: &str) -> Result<Option<Categoria>, CoreError> {
        Ok(self
            .categorias
            .iter()
            .find(|c| c.id.as_deref() == Some(id))
            .cloned())
    }
}

/// Postgres-backed service (feature `database`).
#[cfg(feature = "database")]
pub use pg::PgProductoService;

#[cfg(feature = "database")]
mod pg {
    use super::*;
    use sqlx::{PgPool, Row};

    pub struct PgProductoService {
        pool: PgPool,
    }

    impl PgProductoService {
        pub fn new(pool: PgPool) -> Self {
            Self { pool }
        }

        fn row_to_producto(row: &sqlx::postgres::PgRow) -> Producto {
            Producto {
                id: Some(row.get::<String, _>("id")),
                nombre: row.get("nombre"),
                precio: row.get("precio"),
                create_at: row.get("create_at"),
                categoria: Categoria {
                    id: row.get("categoria_id"),
                    nombre: row.get("categoria_nombre"),
                },
                foto: row.get("foto"),
            }
        }
    }

    const SELECT_PRODUCTO: &str = "SELECT p.id, p.nombre, p.precio, p.create_at, p.foto, \
         c.id AS categoria_id, c.nombre AS categoria_nombre \
         FROM productos p JOIN categorias c ON c.id = p.categoria_id";

    #[async_trait]
    impl ProductoService for PgProductoService {
        async fn find_all(&self) -> Result<Vec<Producto>, CoreError> {
            let rows = sqlx::query(&format!("{} ORDER BY p.nombre", SELECT_PRODUCTO))
                .fetch_all(&self.pool)
                .await?;
            Ok(rows.iter().map(Self::row_to_producto).collect())
        }

        async fn find_all_nombre_upper(&self) -> Result<Vec<Producto>, CoreError> {
            let mut lista = self.find_all().await?;
            for p in &mut lista {
                p.nombre = p.nombre.to_uppercase();
            }
            Ok(lista)
        }

        async fn find_all_nombre_upper_repeat(
            &self,
            veces: usize,
        ) -> Result<Vec<Producto>, CoreError> {
            let base = self.find_all_nombre_upper().await?;
            let mut lista = Vec::with_capacity(base.len() * veces);
            for _ in 0..veces {
                lista.extend(base.iter().cloned());
            }
            Ok(lista)
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<Producto>, CoreError> {
            let row = sqlx::query(&format!("{} WHERE p.id = $1", SELECT_PRODUCTO))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row.as_ref().map(Self::row_to_producto))
        }

        async fn save(&self, mut producto: Producto) -> Result<Producto, CoreError> {
            let id = match &producto.id {
                Some(id) => id.clone(),
                None => {
                    let id = uuid::Uuid::new_v4().to_string();
                    producto.id = Some(id.clone());
                    id
                }
            };
            sqlx::query(
                "INSERT INTO productos (id, nombre, precio, create_at, categoria_id, foto) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 ON CONFLICT (id) DO UPDATE SET nombre = $2, precio = $3, create_at = $4, \
                 categoria_id = $5, foto = $6",
            )
            .bind(&id)
            .bind(&producto.nombre)
            .bind(producto.precio)
            .bind(producto.create_at)
            .bind(&producto.categoria.id)
            .bind(&producto.foto)
            .execute(&self.pool)
            .await?;
            Ok(producto)
        }

        async fn delete(&self, id: &str) -> Result<(), CoreError> {
            let result = sqlx::query("DELETE FROM productos WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(CoreError::NotFound(format!("no existe el producto {}", id)));
            }
            Ok(())
        }

        async fn find_all_categorias(&self) -> Result<Vec<Categoria>, CoreError> {
            let rows = sqlx::query("SELECT id, nombre FROM categorias ORDER BY nombre")
                .fetch_all(&self.pool)
                .await?;
            Ok(rows
                .iter()
                .map(|row| Categoria {
                    id: Some(row.get("id")),
                    nombre: row.get("nombre"),
                })
                .collect())
        }

        async fn find_categoria_by_id(&self, id: &str) -> Result<Option<Categoria>, CoreError> {
            let row = sqlx::query("SELECT id, nombre FROM categorias WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row.map(|row| Categoria {
                id: Some(row.get("id")),
                nombre: row.get("nombre"),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_assigns_id_when_absent() {
        let service = InMemoryProductoService::new();
        let categoria = service.find_categoria_by_id("1").await.unwrap().unwrap();
        let guardado = service
            .save(Producto::new("TV Sony", 456.89, categoria))
            .await
            .unwrap();
        assert!(guardado.id.is_some());
    }

    #[tokio::test]
    async fn save_with_id_updates_in_place() {
        let service = InMemoryProductoService::new();
        let categoria = service.find_categoria_by_id("1").await.unwrap().unwrap();
        let mut guardado = service
            .save(Producto::new("TV Sony", 456.89, categoria))
            .await
            .unwrap();
        guardado.precio = 399.99;
        let actualizado = service.save(guardado.clone()).await.unwrap();
        assert_eq!(actualizado.id, guardado.id);
        assert_eq!(service.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn find_by_id_unknown_is_none() {
        let service = InMemoryProductoService::new();
        assert!(service.find_by_id("doesnotexist").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let service = InMemoryProductoService::new();
        let err = service.delete("doesnotexist").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn nombre_upper_does_not_mutate_store() {
        let service = InMemoryProductoService::new();
        let categoria = service.find_categoria_by_id("2").await.unwrap().unwrap();
        let guardado = service
            .save(Producto::new("Bicicleta Bianchi", 70.0, categoria))
            .await
            .unwrap();

        let listado = service.find_all_nombre_upper().await.unwrap();
        assert_eq!(listado[0].nombre, "BICICLETA BIANCHI");

        let almacenado = service
            .find_by_id(guardado.id.as_deref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(almacenado.nombre, "Bicicleta Bianchi");
    }

    #[tokio::test]
    async fn repeat_multiplies_the_listing() {
        let service = InMemoryProductoService::with_sample_data();
        let base = service.find_all_nombre_upper().await.unwrap();
        let repetido = service.find_all_nombre_upper_repeat(3).await.unwrap();
        assert_eq!(repetido.len(), base.len() * 3);
    }

    #[tokio::test]
    async fn categorias_are_fixed_and_resolvable() {
        let service = InMemoryProductoService::new();
        let todas = service.find_all_categorias().await.unwrap();
        assert_eq!(todas.len(), 5);
        let quinta = service.find_categoria_by_id("5").await.unwrap();
        assert!(quinta.is_some());
        assert!(service.find_categoria_by_id("99").await.unwrap().is_none());
    }
}
