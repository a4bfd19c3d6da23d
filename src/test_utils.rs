use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use actix_web::{App, web};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::phone_number::en::PhoneNumber;

use crate::config::Config;
use crate::database::models::*;
use crate::database::store::{CuadrillaStore, MensajeStore, RegistroStore, RolStore};
use crate::error::AppError;
use crate::handlers::shared::{json_config, path_config, query_config};
use crate::routes;
use crate::services::capacity;
use crate::services::complaints::ComplaintsApi;
use crate::services::menu::SECCIONES;
use crate::services::Claims;
use crate::AppState;

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    cuadrillas: BTreeMap<i64, Cuadrilla>,
    cuadrilla_tipos: HashMap<i64, BTreeSet<i64>>,
    tipos: BTreeMap<i64, TipoCuadrilla>,
    registros: BTreeMap<i64, RegistroReclamo>,
    mensajes: Vec<Mensaje>,
    roles: HashMap<String, RolPermisos>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn abiertos(&self, cuadrilla_id: i64) -> i64 {
        self.registros
            .values()
            .filter(|r| r.cuadrilla_id == cuadrilla_id && r.estado.is_open())
            .count() as i64
    }

    fn with_tipos(&self, cuadrilla: &Cuadrilla) -> Cuadrilla {
        let mut cuadrilla = cuadrilla.clone();
        let mut tipos: Vec<TipoCuadrilla> = self
            .cuadrilla_tipos
            .get(&cuadrilla.id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.tipos.get(id).cloned())
            .collect();
        tipos.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        cuadrilla.tipos = tipos;
        cuadrilla
    }

    fn check_tipos(&self, tipo_ids: &[i64]) -> Result<BTreeSet<i64>, AppError> {
        let ids: BTreeSet<i64> = tipo_ids.iter().copied().collect();
        if ids.iter().any(|id| !self.tipos.contains_key(id)) {
            return Err(AppError::BadRequest(
                "Uno o más tipos de cuadrilla no existen".to_string(),
            ));
        }
        Ok(ids)
    }

    fn refresh_disponible(&mut self, cuadrilla_id: i64) {
        let abiertos = self.abiertos(cuadrilla_id);
        if let Some(cuadrilla) = self.cuadrillas.get_mut(&cuadrilla_id) {
            cuadrilla.disponible =
                capacity::is_available(abiertos, cuadrilla.limite_reclamos_simultaneos);
            cuadrilla.updated_at = Utc::now();
        }
    }
}

/// In-memory implementation of every store trait. One mutex guards all
/// state, which gives the same per-crew serialization the row locks give.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().expect("memory store poisoned")
    }

    pub fn registro_count(&self) -> usize {
        self.lock().registros.len()
    }

    /// Seeds a role with the given permissions.
    pub fn seed_rol(&self, rol: &str, permisos: &[&str]) {
        self.lock().roles.insert(
            rol.to_string(),
            RolPermisos {
                rol: rol.to_string(),
                permisos: permisos.iter().map(|p| p.to_string()).collect(),
                updated_at: Utc::now(),
            },
        );
    }
}

#[async_trait]
impl CuadrillaStore for MemoryStore {
    async fn list_cuadrillas(&self) -> Result<Vec<Cuadrilla>, AppError> {
        let state = self.lock();
        let mut cuadrillas: Vec<Cuadrilla> = state
            .cuadrillas
            .values()
            .map(|c| state.with_tipos(c))
            .collect();
        cuadrillas.sort_by(|a, b| a.nombre.cmp(&b.nombre).then(a.id.cmp(&b.id)));
        Ok(cuadrillas)
    }

    async fn find_cuadrilla(&self, id: i64) -> Result<Option<Cuadrilla>, AppError> {
        let state = self.lock();
        Ok(state.cuadrillas.get(&id).map(|c| state.with_tipos(c)))
    }

    async fn create_cuadrilla(&self, input: &CuadrillaInput) -> Result<Cuadrilla, AppError> {
        let mut state = self.lock();
        let tipo_ids = state.check_tipos(input.tipo_ids())?;
        let now = Utc::now();
        let id = state.next_id();

        let cuadrilla = Cuadrilla {
            id,
            nombre: input.nombre.trim().to_string(),
            telefono: input.telefono.clone(),
            disponible: true,
            ultima_asignacion: None,
            limite_reclamos_simultaneos: input.limite(),
            reclamos_asignados: Vec::new(),
            tipos: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        state.cuadrillas.insert(id, cuadrilla.clone());
        state.cuadrilla_tipos.insert(id, tipo_ids);
        Ok(state.with_tipos(&cuadrilla))
    }

    async fn update_cuadrilla(
        &self,
        id: i64,
        input: &CuadrillaInput,
    ) -> Result<Option<Cuadrilla>, AppError> {
        let mut state = self.lock();
        if !state.cuadrillas.contains_key(&id) {
            return Ok(None);
        }
        let tipo_ids = match &input.tipo_ids {
            Some(ids) => Some(state.check_tipos(ids)?),
            None => None,
        };

        if let Some(cuadrilla) = state.cuadrillas.get_mut(&id) {
            cuadrilla.nombre = input.nombre.trim().to_string();
            cuadrilla.telefono = input.telefono.clone();
            cuadrilla.limite_reclamos_simultaneos =
                input.limite_or(cuadrilla.limite_reclamos_simultaneos);
        }
        if let Some(tipo_ids) = tipo_ids {
            state.cuadrilla_tipos.insert(id, tipo_ids);
        }
        state.refresh_disponible(id);

        Ok(state.cuadrillas.get(&id).map(|c| state.with_tipos(c)))
    }

    async fn delete_cuadrilla(&self, id: i64) -> Result<bool, AppError> {
        let mut state = self.lock();
        if state.cuadrillas.remove(&id).is_none() {
            return Ok(false);
        }
        state.cuadrilla_tipos.remove(&id);
        state.registros.retain(|_, r| r.cuadrilla_id != id);
        state.mensajes.retain(|m| m.cuadrilla_id != id);
        Ok(true)
    }

    async fn list_tipos(&self) -> Result<Vec<TipoCuadrilla>, AppError> {
        let mut tipos: Vec<TipoCuadrilla> = self.lock().tipos.values().cloned().collect();
        tipos.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        Ok(tipos)
    }

    async fn create_tipo(&self, nombre: &str) -> Result<TipoCuadrilla, AppError> {
        let mut state = self.lock();
        let nombre = nombre.trim();
        if state.tipos.values().any(|t| t.nombre == nombre) {
            return Err(AppError::BadRequest(format!(
                "El tipo de cuadrilla '{}' ya existe",
                nombre
            )));
        }
        let id = state.next_id();
        let tipo = TipoCuadrilla {
            id,
            nombre: nombre.to_string(),
        };
        state.tipos.insert(id, tipo.clone());
        Ok(tipo)
    }
}

#[async_trait]
impl RegistroStore for MemoryStore {
    async fn reserve(
        &self,
        cuadrilla_id: i64,
        nuevo: &NuevoRegistroReclamo,
    ) -> Result<Reserva, AppError> {
        let mut state = self.lock();
        let now = Utc::now();

        let previa = state
            .cuadrillas
            .get(&cuadrilla_id)
            .ok_or_else(|| AppError::cuadrilla_not_found(cuadrilla_id))?
            .clone();

        let abiertos = state.abiertos(cuadrilla_id);
        capacity::check_admission(cuadrilla_id, abiertos, previa.limite_reclamos_simultaneos)?;

        let id = state.next_id();
        let detalles = &nuevo.detalles;
        let registro = RegistroReclamo {
            id,
            cuadrilla_id,
            reclamo_id: nuevo.reclamo_id,
            reclamo: detalles.reclamo.clone(),
            fecha: detalles.fecha.clone(),
            prioridad: detalles.prioridad.clone(),
            detalle: detalles.detalle.clone(),
            ubicacion: detalles.ubicacion.clone(),
            barrio: detalles.barrio.clone(),
            estado: EstadoReclamo::Asignado,
            created_at: now,
            updated_at: now,
        };
        state.registros.insert(id, registro.clone());

        let cuadrilla = match state.cuadrillas.get_mut(&cuadrilla_id) {
            Some(c) => {
                c.disponible =
                    capacity::is_available(abiertos + 1, c.limite_reclamos_simultaneos);
                c.ultima_asignacion = Some(now);
                c.reclamos_asignados.push(nuevo.reclamo_id);
                c.updated_at = now;
                c.clone()
            }
            None => return Err(AppError::cuadrilla_not_found(cuadrilla_id)),
        };

        Ok(Reserva {
            cuadrilla: state.with_tipos(&cuadrilla),
            registro,
            ultima_asignacion_previa: previa.ultima_asignacion,
        })
    }

    async fn release(&self, reserva: &Reserva) -> Result<(), AppError> {
        let mut state = self.lock();
        let cuadrilla_id = reserva.cuadrilla.id;

        state.registros.remove(&reserva.registro.id);

        if let Some(c) = state.cuadrillas.get_mut(&cuadrilla_id) {
            capacity::remove_last(&mut c.reclamos_asignados, reserva.registro.reclamo_id);
            if c.ultima_asignacion == reserva.cuadrilla.ultima_asignacion {
                c.ultima_asignacion = reserva.ultima_asignacion_previa;
            }
        }
        state.refresh_disponible(cuadrilla_id);

        Ok(())
    }

    async fn list_registros(
        &self,
        cuadrilla_id: i64,
        solo_abiertos: bool,
    ) -> Result<Vec<RegistroReclamo>, AppError> {
        let state = self.lock();
        let mut registros: Vec<RegistroReclamo> = state
            .registros
            .values()
            .filter(|r| r.cuadrilla_id == cuadrilla_id)
            .filter(|r| !solo_abiertos || r.estado.is_open())
            .cloned()
            .collect();
        registros.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(registros)
    }

    async fn update_estado(
        &self,
        registro_id: i64,
        estado: EstadoReclamo,
    ) -> Result<Option<RegistroReclamo>, AppError> {
        let mut state = self.lock();

        let Some(registro) = state.registros.get_mut(&registro_id) else {
            return Ok(None);
        };

        if registro.estado.is_terminal() && registro.estado != estado {
            return Err(AppError::BadRequest(format!(
                "El registro {} ya está cerrado ({}) y no puede pasar a {}",
                registro_id, registro.estado, estado
            )));
        }

        registro.estado = estado;
        registro.updated_at = Utc::now();
        let registro = registro.clone();

        state.refresh_disponible(registro.cuadrilla_id);

        Ok(Some(registro))
    }
}

#[async_trait]
impl MensajeStore for MemoryStore {
    async fn list_mensajes(&self, cuadrilla_id: i64) -> Result<Vec<Mensaje>, AppError> {
        Ok(self
            .lock()
            .mensajes
            .iter()
            .filter(|m| m.cuadrilla_id == cuadrilla_id)
            .cloned()
            .collect())
    }

    async fn create_mensaje(&self, nuevo: &NuevoMensaje) -> Result<Mensaje, AppError> {
        let mut state = self.lock();
        let id = state.next_id();
        let mensaje = Mensaje {
            id,
            cuadrilla_id: nuevo.cuadrilla_id,
            remitente: nuevo.remitente.clone(),
            contenido: nuevo.contenido.clone(),
            es_sistema: nuevo.es_sistema,
            created_at: Utc::now(),
        };
        state.mensajes.push(mensaje.clone());
        Ok(mensaje)
    }
}

#[async_trait]
impl RolStore for MemoryStore {
    async fn find_rol(&self, rol: &str) -> Result<Option<RolPermisos>, AppError> {
        Ok(self.lock().roles.get(rol).cloned())
    }

    async fn upsert_permisos(
        &self,
        rol: &str,
        permisos: &[String],
    ) -> Result<RolPermisos, AppError> {
        let registro = RolPermisos {
            rol: rol.to_string(),
            permisos: permisos.to_vec(),
            updated_at: Utc::now(),
        };
        self.lock().roles.insert(rol.to_string(), registro.clone());
        Ok(registro)
    }
}

/// Complaints service double that records calls and can be told to fail.
#[derive(Default)]
pub struct StubComplaints {
    calls: Mutex<Vec<(i64, i64)>>,
    failing: Mutex<bool>,
}

impl StubComplaints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, failing: bool) {
        *self.failing.lock().expect("stub poisoned") = failing;
    }

    pub fn calls(&self) -> Vec<(i64, i64)> {
        self.calls.lock().expect("stub poisoned").clone()
    }
}

#[async_trait]
impl ComplaintsApi for StubComplaints {
    async fn mark_assigned(&self, reclamo_id: i64, cuadrilla_id: i64) -> Result<(), AppError> {
        self.calls
            .lock()
            .expect("stub poisoned")
            .push((reclamo_id, cuadrilla_id));

        if *self.failing.lock().expect("stub poisoned") {
            return Err(AppError::Upstream(format!(
                "PATCH /reclamos/{} returned 503 Service Unavailable",
                reclamo_id
            )));
        }
        Ok(())
    }
}

/// Configuration extension for testing
impl Config {
    pub fn test_config() -> Result<Self> {
        Ok(Config {
            database_url: "postgres://localhost/cuadrillas_test".to_string(),
            database_max_connections: 1,
            jwt_secret: "test_jwt_secret_key_for_testing_only".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            complaints_api_url: "http://127.0.0.1:9".to_string(),
            complaints_api_timeout_secs: 1,
            cors_origin: "http://localhost:3000".to_string(),
        })
    }
}

/// Test application wired to one [`MemoryStore`] and a [`StubComplaints`].
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub complaints: Arc<StubComplaints>,
    pub config: Config,
}

impl TestApp {
    pub fn new() -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        store.seed_rol(
            "admin",
            &SECCIONES.iter().filter_map(|s| s.id).collect::<Vec<_>>(),
        );

        Ok(TestApp {
            store,
            complaints: Arc::new(StubComplaints::new()),
            config: Config::test_config()?,
        })
    }

    pub fn state(&self) -> AppState {
        AppState::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.complaints.clone(),
        )
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.config.clone()))
            .app_data(web::Data::new(self.state()))
            .app_data(json_config())
            .app_data(path_config())
            .app_data(query_config())
            .configure(routes::configure)
    }
}

/// Authentication helper for tests
pub struct AuthHelper;

impl AuthHelper {
    pub fn create_test_token(email: &str, role: &str, config: &Config) -> Result<String> {
        Self::token_with_expiry(email, role, config, Duration::hours(24))
    }

    pub fn token_with_expiry(
        email: &str,
        role: &str,
        config: &Config,
        valid_for: Duration,
    ) -> Result<String> {
        use jsonwebtoken::{EncodingKey, Header, encode};

        let claims = Claims {
            sub: "1".to_string(),
            email: email.to_string(),
            role: role.to_string(),
            exp: (Utc::now() + valid_for).timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_ref()),
        )
        .map_err(|e| anyhow::anyhow!("Failed to create test token: {}", e))
    }

    pub fn admin_token(config: &Config) -> Result<(String, String)> {
        let email: String = SafeEmail().fake();
        let token = Self::create_test_token(&email, "admin", config)?;
        Ok((email, token))
    }

    /// Create authorization header for requests
    pub fn auth_header(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }
}

/// Mock data generators using the fake crate
pub struct MockData;

impl MockData {
    pub fn cuadrilla(limite: Option<i32>) -> CuadrillaInput {
        CuadrillaInput {
            nombre: format!("Cuadrilla {}", CompanyName().fake::<String>()),
            telefono: Some(PhoneNumber().fake()),
            limite_reclamos_simultaneos: limite,
            tipo_ids: None,
        }
    }
}

pub async fn create_test_cuadrilla(store: &MemoryStore, limite: i32) -> Cuadrilla {
    store
        .create_cuadrilla(&MockData::cuadrilla(Some(limite)))
        .await
        .expect("Failed to create test cuadrilla")
}
